pub use super::accounts::Entity as Accounts;
pub use super::purchases::Entity as Purchases;
pub use super::toys::Entity as Toys;
