//! `SeaORM` entity definitions.

pub mod clients;
pub mod collectors;
pub mod payments;
pub mod sea_orm_active_enums;

pub mod prelude {
    //! Entity re-exports.
    pub use super::clients::Entity as Clients;
    pub use super::collectors::Entity as Collectors;
    pub use super::payments::Entity as Payments;
}
