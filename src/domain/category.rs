//! The closed catalog of spending categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorises expenses for grouping and reporting.
///
/// The catalog is a fixed set known at build time. Stored category strings
/// are matched against [`Category::key`] case-insensitively; anything that
/// does not match resolves to [`Category::Other`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Groceries,
    Transport,
    Fuel,
    Shopping,
    Entertainment,
    Health,
    Fitness,
    Education,
    Rent,
    Utilities,
    Bills,
    Travel,
    Subscriptions,
    Gifts,
    PersonalCare,
    Insurance,
    Investments,
    Donations,
    Other,
}

impl Category {
    pub const ALL: [Category; 20] = [
        Category::Food,
        Category::Groceries,
        Category::Transport,
        Category::Fuel,
        Category::Shopping,
        Category::Entertainment,
        Category::Health,
        Category::Fitness,
        Category::Education,
        Category::Rent,
        Category::Utilities,
        Category::Bills,
        Category::Travel,
        Category::Subscriptions,
        Category::Gifts,
        Category::PersonalCare,
        Category::Insurance,
        Category::Investments,
        Category::Donations,
        Category::Other,
    ];

    /// Canonical key, the form persisted in the store.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Groceries => "GROCERIES",
            Category::Transport => "TRANSPORT",
            Category::Fuel => "FUEL",
            Category::Shopping => "SHOPPING",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Health => "HEALTH",
            Category::Fitness => "FITNESS",
            Category::Education => "EDUCATION",
            Category::Rent => "RENT",
            Category::Utilities => "UTILITIES",
            Category::Bills => "BILLS",
            Category::Travel => "TRAVEL",
            Category::Subscriptions => "SUBSCRIPTIONS",
            Category::Gifts => "GIFTS",
            Category::PersonalCare => "PERSONAL_CARE",
            Category::Insurance => "INSURANCE",
            Category::Investments => "INVESTMENTS",
            Category::Donations => "DONATIONS",
            Category::Other => "OTHER",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Food => "Food & Dining",
            Category::Groceries => "Groceries",
            Category::Transport => "Transport",
            Category::Fuel => "Fuel",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Fitness => "Fitness",
            Category::Education => "Education",
            Category::Rent => "Rent",
            Category::Utilities => "Utilities",
            Category::Bills => "Bills & Recharges",
            Category::Travel => "Travel",
            Category::Subscriptions => "Subscriptions",
            Category::Gifts => "Gifts",
            Category::PersonalCare => "Personal Care",
            Category::Insurance => "Insurance",
            Category::Investments => "Investments",
            Category::Donations => "Donations",
            Category::Other => "Other",
        }
    }

    /// Shortened label for chart axes.
    pub fn short_label(&self) -> String {
        let name = self.display_name();
        if name.chars().count() <= 10 {
            name.to_string()
        } else {
            name.chars().take(9).collect::<String>() + "."
        }
    }

    /// Resolves a stored category string, falling back to [`Category::Other`]
    /// for unknown or legacy values.
    pub fn from_stored(raw: &str) -> Category {
        let trimmed = raw.trim();
        Category::ALL
            .iter()
            .find(|category| category.key().eq_ignore_ascii_case(trimmed))
            .copied()
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
