pub mod create_product;
pub mod create_tax;
pub mod delete_product;
pub mod delete_tax;
pub mod get_product;
pub mod get_tax;
pub mod list_products;
pub mod list_taxes;
pub mod update_product;
pub mod update_tax;

pub use create_product::{CreateProductCommand, CreateProductUseCase, ProductFields};
pub use create_tax::{CreateTaxCommand, CreateTaxUseCase, TaxFields};
pub use delete_product::DeleteProductUseCase;
pub use delete_tax::DeleteTaxUseCase;
pub use get_product::{GetProductUseCase, ProductDto};
pub use get_tax::{GetTaxUseCase, TaxDto};
pub use list_products::ListProductsUseCase;
pub use list_taxes::ListTaxesUseCase;
pub use update_product::{UpdateProductCommand, UpdateProductUseCase};
pub use update_tax::{UpdateTaxCommand, UpdateTaxUseCase};
