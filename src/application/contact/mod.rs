pub mod create_contact;
pub mod delete_contact;
pub mod get_contact;
pub mod list_contacts;
pub mod update_contact;

pub use create_contact::{
  ContactAddressInput, ContactFields, CreateContactCommand, CreateContactUseCase,
};
pub use delete_contact::DeleteContactUseCase;
pub use get_contact::{ContactDto, GetContactUseCase};
pub use list_contacts::{ListContactsCommand, ListContactsResponse, ListContactsUseCase};
pub use update_contact::{UpdateContactCommand, UpdateContactUseCase};
