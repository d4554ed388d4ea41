pub use super::{blocks::Entity as Blocks, pages::Entity as Pages};
