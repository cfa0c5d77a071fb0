use std::fmt;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolData {
    description: String,
}

impl SymbolData {
    pub fn new(description: String) -> Self {
        SymbolData { description }
    }

    pub fn new_empty() -> Self {
        SymbolData {
            description: Uuid::new_v4().to_hyphenated().to_string(),
        }
    }
}
impl Display for SymbolData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}
