//! In-memory adapters for service tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

use crate::domain::catalog::{
  CatalogError, Product, ProductRepository, Tax, TaxComputation, TaxRepository,
};
use crate::domain::common::{Currency, Name, UnitPrice};
use crate::domain::contact::{
  Contact, ContactDetails, ContactError, ContactKind, ContactRepository, EmailAddress,
};
use crate::domain::invoice::{
  BlobStore, Invoice, InvoiceDocument, InvoiceError, InvoiceFilter, InvoiceNumber,
  InvoiceRepository, InvoiceService, InvoiceServiceDependencies, InvoicingPolicy, LineItemDraft,
  NewInvoice, PdfGenerator, Quantity, StorageBackend, StoredBlob, TaxCalculator, TaxSnapshot,
};
use crate::domain::payment::{
  GatewayOrder, Payment, PaymentError, PaymentGateway, PaymentRepository,
};

/// Invoice service backed entirely by one store, default policy
pub fn invoice_service(store: &Arc<InMemoryStore>) -> InvoiceService {
  InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo: store.clone(),
    contact_repo: store.clone(),
    tax_repo: store.clone(),
    product_repo: store.clone(),
    policy: InvoicingPolicy::default(),
  })
}

pub fn sample_customer(organization_id: Uuid) -> Contact {
  Contact::new(
    organization_id,
    ContactDetails {
      name: Name::new("Northwind Traders".to_string()).unwrap(),
      email: Some(EmailAddress::new(format!("ap+{}@northwind.test", Uuid::new_v4().simple())).unwrap()),
      phone: None,
      address: None,
      kind: ContactKind::Customer,
    },
  )
}

/// Draft INR invoice: 2 x 100 at 18% plus 3 x 50 with a fixed 20, grand total 406
pub fn sample_invoice(organization_id: Uuid, customer_id: Uuid) -> Invoice {
  let snapshot = |rate, computation| TaxSnapshot {
    tax_id: Uuid::new_v4(),
    name: "Tax".to_string(),
    rate,
    computation,
  };
  Invoice::new(
    NewInvoice {
      organization_id,
      customer_id,
      invoice_number: InvoiceNumber::new(format!("T-{}", Uuid::new_v4().simple())).unwrap(),
      invoice_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      due_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
      currency: Currency::INR,
      notes: None,
      line_items: vec![
        LineItemDraft {
          product_id: None,
          product_name: Name::new("Consulting".to_string()).unwrap(),
          quantity: Quantity::new(2).unwrap(),
          unit_price: UnitPrice::new(dec!(100)).unwrap(),
          tax: Some(snapshot(dec!(18), TaxComputation::Percentage)),
        },
        LineItemDraft {
          product_id: None,
          product_name: Name::new("Shipping".to_string()).unwrap(),
          quantity: Quantity::new(3).unwrap(),
          unit_price: UnitPrice::new(dec!(50)).unwrap(),
          tax: Some(snapshot(dec!(20), TaxComputation::Fixed)),
        },
      ],
    },
    &TaxCalculator::default(),
  )
  .unwrap()
}

#[derive(Default)]
pub struct InMemoryStore {
  contacts: Mutex<HashMap<Uuid, Contact>>,
  invoiced_contacts: Mutex<HashSet<Uuid>>,
  taxes: Mutex<HashMap<Uuid, Tax>>,
  products: Mutex<HashMap<Uuid, Product>>,
  invoices: Mutex<HashMap<Uuid, Invoice>>,
  payments: Mutex<Vec<Payment>>,
  sequence: AtomicI64,
}

impl InMemoryStore {
  pub fn insert_contact(&self, contact: Contact) {
    self.contacts.lock().unwrap().insert(contact.id, contact);
  }

  pub fn mark_contact_invoiced(&self, contact_id: Uuid) {
    self.invoiced_contacts.lock().unwrap().insert(contact_id);
  }

  pub fn insert_tax(&self, tax: Tax) {
    self.taxes.lock().unwrap().insert(tax.id, tax);
  }

  pub fn insert_product(&self, product: Product) {
    self.products.lock().unwrap().insert(product.id, product);
  }

  pub fn insert_invoice(&self, invoice: Invoice) {
    self.invoices.lock().unwrap().insert(invoice.id, invoice);
  }

  pub fn invoice(&self, id: Uuid) -> Option<Invoice> {
    self.invoices.lock().unwrap().get(&id).cloned()
  }

  pub fn invoice_count(&self) -> usize {
    self.invoices.lock().unwrap().len()
  }

  pub async fn update_invoice(
    &self,
    invoice: Invoice,
    expected_version: i64,
  ) -> Result<Invoice, InvoiceError> {
    InvoiceRepository::update(self, invoice, expected_version).await
  }

  fn compare_and_swap(
    &self,
    mut invoice: Invoice,
    expected_version: i64,
  ) -> Result<Invoice, InvoiceError> {
    let mut invoices = self.invoices.lock().unwrap();
    let stored = invoices
      .get(&invoice.id)
      .ok_or(InvoiceError::InvoiceNotFound(invoice.id))?;
    if stored.version != expected_version {
      return Err(InvoiceError::StaleWrite {
        id: invoice.id,
        expected_version,
      });
    }
    invoice.version = expected_version + 1;
    invoices.insert(invoice.id, invoice.clone());
    Ok(invoice)
  }
}

#[async_trait]
impl ContactRepository for InMemoryStore {
  async fn create(&self, contact: Contact) -> Result<Contact, ContactError> {
    self.insert_contact(contact.clone());
    Ok(contact)
  }

  async fn update(&self, contact: Contact) -> Result<Contact, ContactError> {
    self.insert_contact(contact.clone());
    Ok(contact)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, ContactError> {
    Ok(self.contacts.lock().unwrap().get(&id).cloned())
  }

  async fn find_by_organization(
    &self,
    organization_id: Uuid,
    kind: Option<ContactKind>,
  ) -> Result<Vec<Contact>, ContactError> {
    let mut contacts: Vec<Contact> = self
      .contacts
      .lock()
      .unwrap()
      .values()
      .filter(|c| c.organization_id == organization_id)
      .filter(|c| kind.is_none_or(|k| c.kind.matches(k)))
      .cloned()
      .collect();
    contacts.sort_by(|a, b| a.name.value().cmp(b.name.value()));
    Ok(contacts)
  }

  async fn exists_by_email(
    &self,
    organization_id: Uuid,
    email: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, ContactError> {
    Ok(self.contacts.lock().unwrap().values().any(|c| {
      c.organization_id == organization_id
        && Some(c.id) != exclude_id
        && c.email.as_ref().is_some_and(|e| e.as_str() == email)
    }))
  }

  async fn has_invoices(&self, id: Uuid) -> Result<bool, ContactError> {
    let invoiced = self.invoiced_contacts.lock().unwrap().contains(&id);
    Ok(invoiced || self.invoices.lock().unwrap().values().any(|i| i.customer_id == id))
  }

  async fn delete(&self, id: Uuid) -> Result<(), ContactError> {
    self.contacts.lock().unwrap().remove(&id);
    Ok(())
  }
}

#[async_trait]
impl TaxRepository for InMemoryStore {
  async fn create(&self, tax: Tax) -> Result<Tax, CatalogError> {
    self.insert_tax(tax.clone());
    Ok(tax)
  }

  async fn update(&self, tax: Tax) -> Result<Tax, CatalogError> {
    self.insert_tax(tax.clone());
    Ok(tax)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Tax>, CatalogError> {
    Ok(self.taxes.lock().unwrap().get(&id).cloned())
  }

  async fn find_by_organization(&self, organization_id: Uuid) -> Result<Vec<Tax>, CatalogError> {
    Ok(
      self
        .taxes
        .lock()
        .unwrap()
        .values()
        .filter(|t| t.organization_id == organization_id)
        .cloned()
        .collect(),
    )
  }

  async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
    self.taxes.lock().unwrap().remove(&id);
    Ok(())
  }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
  async fn create(&self, product: Product) -> Result<Product, CatalogError> {
    self.insert_product(product.clone());
    Ok(product)
  }

  async fn update(&self, product: Product) -> Result<Product, CatalogError> {
    self.insert_product(product.clone());
    Ok(product)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    Ok(self.products.lock().unwrap().get(&id).cloned())
  }

  async fn find_by_organization(
    &self,
    organization_id: Uuid,
  ) -> Result<Vec<Product>, CatalogError> {
    Ok(
      self
        .products
        .lock()
        .unwrap()
        .values()
        .filter(|p| p.organization_id == organization_id)
        .cloned()
        .collect(),
    )
  }

  async fn exists_with_tax(&self, tax_id: Uuid) -> Result<bool, CatalogError> {
    Ok(
      self
        .products
        .lock()
        .unwrap()
        .values()
        .any(|p| p.tax_id == Some(tax_id)),
    )
  }

  async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
    self.products.lock().unwrap().remove(&id);
    Ok(())
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    self.insert_invoice(invoice.clone());
    Ok(invoice)
  }

  async fn update(&self, invoice: Invoice, expected_version: i64) -> Result<Invoice, InvoiceError> {
    self.compare_and_swap(invoice, expected_version)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    Ok(self.invoice(id))
  }

  async fn find_by_organization(
    &self,
    organization_id: Uuid,
    filter: InvoiceFilter,
  ) -> Result<Vec<Invoice>, InvoiceError> {
    let mut invoices: Vec<Invoice> = self
      .invoices
      .lock()
      .unwrap()
      .values()
      .filter(|i| i.organization_id == organization_id)
      .filter(|i| filter.status.is_none_or(|s| i.status == s))
      .filter(|i| filter.customer_id.is_none_or(|c| i.customer_id == c))
      .cloned()
      .collect();
    invoices.sort_by(|a, b| {
      b.invoice_date
        .cmp(&a.invoice_date)
        .then(b.created_at.cmp(&a.created_at))
    });
    Ok(invoices)
  }

  async fn exists_by_number(
    &self,
    invoice_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, InvoiceError> {
    Ok(
      self
        .invoices
        .lock()
        .unwrap()
        .values()
        .any(|i| i.invoice_number.value() == invoice_number && Some(i.id) != exclude_id),
    )
  }

  async fn next_sequence_value(&self) -> Result<i64, InvoiceError> {
    Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
  }

  async fn delete(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let removed = self.invoices.lock().unwrap().remove(&id);
    if removed.is_some() {
      self.payments.lock().unwrap().retain(|p| p.invoice_id != id);
    }
    Ok(removed)
  }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
  async fn record(
    &self,
    payment: Payment,
    invoice: Invoice,
    expected_version: i64,
  ) -> Result<(Payment, Invoice), PaymentError> {
    let invoice = self.compare_and_swap(invoice, expected_version)?;
    self.payments.lock().unwrap().push(payment.clone());
    Ok((payment, invoice))
  }

  async fn find_by_invoice(&self, invoice_id: Uuid) -> Result<Vec<Payment>, PaymentError> {
    Ok(
      self
        .payments
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p.invoice_id == invoice_id)
        .cloned()
        .collect(),
    )
  }

  async fn find_by_contact(&self, contact_id: Uuid) -> Result<Vec<Payment>, PaymentError> {
    Ok(
      self
        .payments
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p.contact_id == contact_id)
        .cloned()
        .collect(),
    )
  }

  async fn exists_by_gateway_payment_id(&self, gateway_payment_id: &str) -> Result<bool, PaymentError> {
    Ok(
      self
        .payments
        .lock()
        .unwrap()
        .iter()
        .any(|p| p.gateway_payment_id.as_deref() == Some(gateway_payment_id)),
    )
  }
}

pub struct StaticPdfGenerator;

impl StaticPdfGenerator {
  pub const BYTES: &'static [u8] = b"%PDF-1.4 test document";
}

#[async_trait]
impl PdfGenerator for StaticPdfGenerator {
  async fn generate(&self, _document: &InvoiceDocument) -> Result<Vec<u8>, InvoiceError> {
    Ok(Self::BYTES.to_vec())
  }
}

pub struct FailingPdfGenerator;

#[async_trait]
impl PdfGenerator for FailingPdfGenerator {
  async fn generate(&self, _document: &InvoiceDocument) -> Result<Vec<u8>, InvoiceError> {
    Err(InvoiceError::PdfGenerationFailed("renderer unavailable".to_string()))
  }
}

#[derive(Default)]
pub struct InMemoryBlobStore {
  blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
  pub fn is_empty(&self) -> bool {
    self.blobs.lock().unwrap().is_empty()
  }

  pub fn len(&self) -> usize {
    self.blobs.lock().unwrap().len()
  }

  pub fn contains(&self, key: &str) -> bool {
    self.blobs.lock().unwrap().contains_key(key)
  }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
  fn backend(&self) -> StorageBackend {
    StorageBackend::Database
  }

  async fn put(
    &self,
    key: &str,
    bytes: Vec<u8>,
    _content_type: &str,
  ) -> Result<StoredBlob, InvoiceError> {
    let size_bytes = bytes.len() as i64;
    self.blobs.lock().unwrap().insert(key.to_string(), bytes);
    Ok(StoredBlob {
      key: key.to_string(),
      size_bytes,
    })
  }

  async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, InvoiceError> {
    Ok(self.blobs.lock().unwrap().get(key).cloned())
  }

  async fn delete(&self, key: &str) -> Result<(), InvoiceError> {
    self.blobs.lock().unwrap().remove(key);
    Ok(())
  }
}

#[derive(Default)]
pub struct FakeGateway {
  orders: Mutex<HashMap<String, GatewayOrder>>,
}

impl FakeGateway {
  pub const KEY_ID: &'static str = "rzp_test_key";
}

#[async_trait]
impl PaymentGateway for FakeGateway {
  fn key_id(&self) -> &str {
    Self::KEY_ID
  }

  async fn create_order(
    &self,
    amount_minor: u64,
    currency: &str,
    receipt: &str,
  ) -> Result<GatewayOrder, PaymentError> {
    let order = GatewayOrder {
      id: format!("order_{}", Uuid::new_v4().simple()),
      amount: amount_minor,
      currency: currency.to_string(),
      receipt: Some(receipt.to_string()),
      status: "created".to_string(),
    };
    self
      .orders
      .lock()
      .unwrap()
      .insert(order.id.clone(), order.clone());
    Ok(order)
  }

  async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, PaymentError> {
    self
      .orders
      .lock()
      .unwrap()
      .get(order_id)
      .cloned()
      .ok_or_else(|| PaymentError::Gateway(format!("Unknown order {}", order_id)))
  }
}
