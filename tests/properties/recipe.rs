//! Property tests for build context assembly.

use proptest::prelude::*;

use microsync::domain::entities::{ChangeAction, PathChange, RECIPE_ENTRY_NAME};
use microsync::domain::services::BuildContextAssembler;

fn relative_path() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9._-]{1,12}").unwrap();
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"))
}

fn change() -> impl Strategy<Value = PathChange> {
    (relative_path(), proptest::option::of(proptest::collection::vec(any::<u8>(), 0..16)))
        .prop_map(|(path, bytes)| match bytes {
            Some(bytes) => PathChange::modify(path, bytes),
            None => PathChange::delete(path),
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: one `from` line plus one line per change, no trailing newline,
    /// and the recipe is the last archive entry.
    #[test]
    fn property_recipe_has_one_line_per_change(
        changes in proptest::collection::vec(change(), 0..20),
        prefix in "(/[a-z]{1,8}){1,3}/?"
    ) {
        let assembler = BuildContextAssembler::new(prefix.clone());
        let context = assembler.assemble("base:latest", &changes);
        let text = context.recipe.render();

        prop_assert!(!text.ends_with('\n'));
        let lines: Vec<&str> = text.split('\n').collect();
        prop_assert_eq!(lines.len(), changes.len() + 1);
        prop_assert_eq!(lines[0], "from base:latest");

        let trimmed = prefix.trim_end_matches('/');
        for (line, change) in lines[1..].iter().zip(&changes) {
            let target = format!("{}/{}", trimmed, change.relative_path());
            match change.action() {
                ChangeAction::Delete => {
                    prop_assert_eq!(line.to_string(), format!("run rm '{}' || exit 0", target));
                }
                _ => {
                    prop_assert_eq!(
                        line.to_string(),
                        format!("copy '{}' '{}'", change.relative_path(), target)
                    );
                }
            }
        }

        let last = context.archive.entries().last().unwrap();
        prop_assert_eq!(last.name.as_str(), RECIPE_ENTRY_NAME);
        prop_assert_eq!(context.archive.len(), context.copies() + 1);
    }
}
