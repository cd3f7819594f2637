use crate::datastore::Post;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The category selection that means "don't filter".
pub const ALL: &str = "all";

/// Which posts the reader wants to see. Never sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Only posts whose category is exactly this string.
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => &post.category == category,
        }
    }

    /// The matching posts, in their original order.
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|post| self.matches(post)).collect()
    }
}

impl From<&str> for CategoryFilter {
    fn from(selection: &str) -> Self {
        if selection == ALL {
            Self::All
        } else {
            Self::Only(selection.to_owned())
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(category) => f.write_str(category),
        }
    }
}
