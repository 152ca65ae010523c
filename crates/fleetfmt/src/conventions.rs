//! Per file class rule tables.
//!
//! A [`Conventions`] value maps the class key of a file, as produced by
//! [`class_for`](crate::classify::class_for), to the passes that run over
//! every document of the file.

use crate::formatter::{ListOrder, ListSort, OptionsIncomplete, Pass, PriorityTable, SortPredicate};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Conventions {
    classes: IndexMap<String, Vec<Pass>>,
    /// Formatting options given along with the table.
    pub options: OptionsIncomplete,
}

impl Conventions {
    /// The conventions of Elastic integration packages.
    pub fn fleet() -> Self {
        let mut conventions = Self::default();
        conventions.insert("_dev/build/build.yml", vec![Pass::CanonicalQuotes]);
        conventions.insert(
            "changelog.yml",
            ordered([
                ("$[*].version", 0),
                ("$[*].changes", 1),
                ("$[*].changes[*].description", 0),
                ("$[*].changes[*].type", 1),
                ("$[*].changes[*].link", 2),
            ]),
        );
        conventions.insert(
            "manifest.yml",
            ordered([
                ("*.name", 0),
                ("*.title", 1),
                ("$.version", 2),
                ("$.release", 3),
                ("*.description", 4),
                ("$.owner", -1),
            ]),
        );
        conventions.insert(
            "data_stream/*/_dev/test/*/test-*-config.yml",
            ordered([("$.service", 0), ("$.input", 1), ("$.data_stream", 2)]),
        );
        conventions.insert(
            "data_stream/*/elasticsearch/ingest_pipeline/*.yml",
            ordered([
                ("*.description", 0),
                ("*.if", 1),
                ("*.field", 2),
                ("*.override", -3),
                ("*.tags", -2),
                ("*.on_failure", -1),
            ]),
        );
        let mut fields = ordered([
            ("*.name", 0),
            ("*.type", 1),
            ("*.level", 2),
            ("*.description", 3),
            ("*.example", -1),
        ]);
        fields.push(Pass::SortLists(ListSort::new(
            SortPredicate::FieldGroup,
            ListOrder::ByName,
        )));
        conventions.insert("data_stream/*/fields/*.yml", fields);
        conventions.insert(
            "data_stream/*/manifest.yml",
            ordered([
                ("*.name", 0),
                ("*.title", 1),
                ("*.type", 2),
                ("*.description", 3),
                ("*.required", 4),
                ("*.show_user", 5),
                ("*.multi", 6),
                ("*.default", -1),
            ]),
        );
        conventions
    }

    pub fn insert(&mut self, class: impl Into<String>, passes: Vec<Pass>) {
        self.classes.insert(class.into(), passes);
    }

    /// The passes for a class key, `None` for files that are not formatted.
    pub fn passes(&self, class: &str) -> Option<&[Pass]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}

fn ordered<const N: usize>(table: [(&str, i64); N]) -> Vec<Pass> {
    vec![
        Pass::CanonicalQuotes,
        Pass::CanonicalOrder(table.into_iter().collect()),
    ]
}

#[cfg(feature = "serde")]
mod file {
    use super::*;
    use crate::Error;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct ConventionsFile {
        #[serde(default)]
        options: OptionsIncomplete,
        #[serde(default)]
        classes: IndexMap<String, ClassRules>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct ClassRules {
        #[serde(default)]
        quotes: bool,
        #[serde(default)]
        order: PriorityTable,
        sort_lists: Option<SortRules>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct SortRules {
        predicate: Option<PredicateName>,
        order: Option<OrderName>,
    }

    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum PredicateName {
        FieldGroup,
        Always,
    }

    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum OrderName {
        ByName,
    }

    impl ClassRules {
        fn into_passes(self) -> Vec<Pass> {
            let mut passes = Vec::new();
            if self.quotes {
                passes.push(Pass::CanonicalQuotes);
            }
            if !self.order.is_empty() {
                passes.push(Pass::CanonicalOrder(self.order));
            }
            if let Some(sort) = self.sort_lists {
                passes.push(Pass::SortLists(ListSort {
                    predicate: sort.predicate.map(|p| match p {
                        PredicateName::FieldGroup => SortPredicate::FieldGroup,
                        PredicateName::Always => SortPredicate::Always,
                    }),
                    order: sort.order.map(|o| match o {
                        OrderName::ByName => ListOrder::ByName,
                    }),
                }));
            }
            passes
        }
    }

    impl Conventions {
        /// Loads a conventions file:
        ///
        /// ```yaml
        /// options:
        ///   indent_width: 2
        /// classes:
        ///   manifest.yml:
        ///     quotes: true
        ///     order:
        ///       "*.name": 0
        ///       $.owner: -1
        ///   data_stream/*/fields/*.yml:
        ///     sort_lists:
        ///       predicate: field_group
        ///       order: by_name
        /// ```
        pub fn from_yaml(source: &str) -> Result<Self, Error> {
            let file: ConventionsFile = serde_yaml::from_str(source)
                .map_err(|err| Error::InvalidConventions(err.to_string()))?;
            let mut conventions = Conventions {
                options: file.options,
                ..Default::default()
            };
            for (class, rules) in file.classes {
                conventions.insert(class, rules.into_passes());
            }
            Ok(conventions)
        }
    }
}
