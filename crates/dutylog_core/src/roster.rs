//! Static roster of classes and students.
//!
//! # Responsibility
//! - Provide the flattened `"<name> (<class>)"` identities used as record keys.
//! - Filter identities for student selection.
//!
//! # Invariants
//! - Identity order is class declaration order, then student declaration
//!   order; search never re-ranks.
//! - The roster is read-only after construction.

const BUILTIN_CLASSES: &[(&str, &[&str])] = &[
    ("10А", &["Иванов Иван", "Петров Петр"]),
    (
        "10Б",
        &[
            "Сидоров Сидор",
            "Александров Александр",
            "Екатерина Катерина",
        ],
    ),
    ("11А", &["Олег Олегов"]),
];

/// One class and its students, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolClass {
    pub name: String,
    pub students: Vec<String>,
}

/// Read-only catalog of classes and their students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    classes: Vec<SchoolClass>,
    identities: Vec<String>,
}

impl Roster {
    /// Builds a roster from `(class, students)` pairs.
    ///
    /// An empty roster is allowed; every query on it returns nothing.
    pub fn new<C, S>(classes: impl IntoIterator<Item = (C, Vec<S>)>) -> Self
    where
        C: Into<String>,
        S: Into<String>,
    {
        let classes = classes
            .into_iter()
            .map(|(name, students)| SchoolClass {
                name: name.into(),
                students: students.into_iter().map(Into::into).collect(),
            })
            .collect::<Vec<_>>();
        let identities = classes
            .iter()
            .flat_map(|class| {
                class
                    .students
                    .iter()
                    .map(move |student| format_identity(student, &class.name))
            })
            .collect();
        Self {
            classes,
            identities,
        }
    }

    /// Compiled-in school roster.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_CLASSES
                .iter()
                .map(|(class, students)| (*class, students.to_vec())),
        )
    }

    /// Class names in declaration order.
    pub fn list_classes(&self) -> Vec<&str> {
        self.classes.iter().map(|class| class.name.as_str()).collect()
    }

    /// All classes with their students.
    pub fn classes(&self) -> &[SchoolClass] {
        &self.classes
    }

    /// Flattened identities in roster order.
    pub fn list_identities(&self) -> &[String] {
        &self.identities
    }

    /// Case-insensitive substring search over identities.
    ///
    /// An empty query returns the full list.
    pub fn search(&self, query: &str) -> Vec<&str> {
        if query.is_empty() {
            return self.identities.iter().map(String::as_str).collect();
        }
        let needle = query.to_lowercase();
        self.identities
            .iter()
            .filter(|identity| identity.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Exact membership test for an identity string.
    pub fn contains(&self, identity: &str) -> bool {
        self.identities.iter().any(|known| known == identity)
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Formats the canonical identity string of a student.
pub fn format_identity(student: &str, class: &str) -> String {
    format!("{student} ({class})")
}

#[cfg(test)]
mod tests {
    use super::{format_identity, Roster};

    #[test]
    fn builtin_flattens_in_declaration_order() {
        let roster = Roster::builtin();
        assert_eq!(roster.list_classes(), vec!["10А", "10Б", "11А"]);
        assert_eq!(
            roster.list_identities().first().map(String::as_str),
            Some("Иванов Иван (10А)")
        );
        assert_eq!(
            roster.list_identities().last().map(String::as_str),
            Some("Олег Олегов (11А)")
        );
        assert_eq!(roster.list_identities().len(), 6);
    }

    #[test]
    fn search_is_case_insensitive_for_cyrillic() {
        let roster = Roster::builtin();
        assert_eq!(roster.search("иванов"), vec!["Иванов Иван (10А)"]);
        assert_eq!(
            roster.search("10б"),
            vec![
                "Сидоров Сидор (10Б)",
                "Александров Александр (10Б)",
                "Екатерина Катерина (10Б)"
            ]
        );
        assert!(roster.search("нет такого").is_empty());
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let roster = Roster::builtin();
        let all = roster.search("");
        assert_eq!(all.len(), roster.list_identities().len());
        assert_eq!(all[1], "Петров Петр (10А)");
    }

    #[test]
    fn empty_roster_is_degenerate_but_valid() {
        let roster = Roster::new(Vec::<(String, Vec<String>)>::new());
        assert!(roster.is_empty());
        assert!(roster.list_classes().is_empty());
        assert!(roster.search("").is_empty());
        assert!(!roster.contains(&format_identity("Кто-то", "1А")));
    }
}
