pub mod value_objects;

pub use value_objects::{
  Currency, Money, Name, UnitPrice, ValueObjectError, max_money, round_money,
};
