//! Service-level tests for the donation payment flow, using in-memory
//! mock repositories behind the storage traits.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::donations::{
    CreateOrderRequest, Donation, DonationCompletion, DonationError, DonationRepositoryTrait,
    DonationService, DonationServiceTrait, DonationStatus, DonationType, NewDonation,
    VerifyPaymentRequest,
};
use crate::donors::{normalize_email, Donor, DonorProfile, DonorRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::gateway::{signature, GatewayCredentials, GatewayError, GatewayOrder, PaymentGatewayTrait};
use crate::notifications::{NotificationError, ReceiptMailerTrait};
use crate::programs::{NewProgram, Program, ProgramRepositoryTrait};
use crate::reporting::{DonationFilters, DonationWithRefs};
use crate::settings::{Settings, SettingsRepositoryTrait, SettingsService, SettingsUpdate};

const KEY_ID: &str = "rzp_test_key";
const KEY_SECRET: &str = "test_key_secret";

// --- Mock settings repository (defaults only) ---

struct MockSettingsRepository;

#[async_trait]
impl SettingsRepositoryTrait for MockSettingsRepository {
    fn get_settings(&self) -> Result<Settings> {
        Ok(Settings::default())
    }

    async fn update_settings(&self, _update: &SettingsUpdate) -> Result<()> {
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<String> {
        Err(Error::Database(DatabaseError::NotFound(key.to_string())))
    }

    async fn update_setting(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

// --- Mock donor repository ---

#[derive(Clone, Default)]
struct MockDonorRepository {
    donors: Arc<Mutex<Vec<Donor>>>,
}

#[async_trait]
impl DonorRepositoryTrait for MockDonorRepository {
    async fn upsert_by_email(&self, profile: DonorProfile) -> Result<Donor> {
        let mut donors = self.donors.lock().unwrap();
        let email = normalize_email(&profile.email);
        if let Some(existing) = donors.iter_mut().find(|d| d.email == email) {
            existing.name = profile.name;
            existing.phone = profile.phone;
            existing.address = profile.address;
            existing.pan_number = profile.pan_number;
            existing.updated_at = Utc::now().naive_utc();
            return Ok(existing.clone());
        }
        let now = Utc::now().naive_utc();
        let donor = Donor {
            id: Uuid::new_v4().to_string(),
            email,
            name: profile.name,
            phone: profile.phone,
            address: profile.address,
            pan_number: profile.pan_number,
            total_donated: Decimal::ZERO,
            donation_count: 0,
            is_recurring_donor: false,
            created_at: now,
            updated_at: now,
        };
        donors.push(donor.clone());
        Ok(donor)
    }

    fn get_by_id(&self, donor_id: &str) -> Result<Donor> {
        self.donors
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == donor_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(donor_id.to_string())))
    }

    fn get_by_email(&self, email: &str) -> Result<Donor> {
        self.donors
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.email == email)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(email.to_string())))
    }

    fn list(&self, _page: i64, _page_size: i64) -> Result<(Vec<Donor>, i64)> {
        let donors = self.donors.lock().unwrap().clone();
        let total = donors.len() as i64;
        Ok((donors, total))
    }
}

// --- Mock program repository ---

#[derive(Clone, Default)]
struct MockProgramRepository {
    programs: Arc<Mutex<Vec<Program>>>,
}

impl MockProgramRepository {
    fn add_program(&self, id: &str, title: &str) {
        let now = Utc::now().naive_utc();
        self.programs.lock().unwrap().push(Program {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            is_active: true,
            raised_amount: Decimal::ZERO,
            donor_count: 0,
            created_at: now,
            updated_at: now,
        });
    }
}

#[async_trait]
impl ProgramRepositoryTrait for MockProgramRepository {
    async fn create(&self, _new_program: NewProgram) -> Result<Program> {
        unimplemented!()
    }

    fn get_by_id(&self, program_id: &str) -> Result<Program> {
        self.programs
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == program_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(program_id.to_string())))
    }

    fn list(&self, _active_only: bool) -> Result<Vec<Program>> {
        Ok(self.programs.lock().unwrap().clone())
    }
}

// --- Mock donation repository ---
//
// Shares the donor and program stores so `complete_and_credit` mutates
// them the way the real grouped write does.

#[derive(Clone)]
struct MockDonationRepository {
    donations: Arc<Mutex<Vec<Donation>>>,
    donors: Arc<Mutex<Vec<Donor>>>,
    programs: Arc<Mutex<Vec<Program>>>,
}

#[async_trait]
impl DonationRepositoryTrait for MockDonationRepository {
    async fn create(&self, new_donation: NewDonation) -> Result<Donation> {
        let now = Utc::now().naive_utc();
        let donation = Donation {
            id: Uuid::new_v4().to_string(),
            donor_id: new_donation.donor_id,
            program_id: new_donation.program_id,
            amount: new_donation.amount,
            currency: new_donation.currency,
            donation_type: new_donation.donation_type,
            status: DonationStatus::Pending,
            gateway_order_id: new_donation.gateway_order_id,
            gateway_payment_id: None,
            gateway_signature: None,
            transaction_id: None,
            receipt: None,
            is_anonymous: new_donation.is_anonymous,
            dedicated_to: new_donation.dedicated_to,
            campaign: new_donation.campaign,
            notes: new_donation.notes,
            created_at: now,
            updated_at: now,
        };
        self.donations.lock().unwrap().push(donation.clone());
        Ok(donation)
    }

    fn get_by_id(&self, donation_id: &str) -> Result<Donation> {
        self.donations
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == donation_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(donation_id.to_string())))
    }

    async fn complete_and_credit(&self, completion: DonationCompletion) -> Result<Donation> {
        let mut donations = self.donations.lock().unwrap();
        let donation = donations
            .iter_mut()
            .find(|d| d.id == completion.donation_id)
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(completion.donation_id.clone()))
            })?;

        donation.status = DonationStatus::Completed;
        donation.gateway_payment_id = Some(completion.gateway_payment_id.clone());
        donation.gateway_signature = Some(completion.gateway_signature.clone());
        donation.transaction_id = Some(completion.gateway_payment_id.clone());
        donation.receipt = Some(completion.receipt.clone());
        donation.updated_at = Utc::now().naive_utc();

        let mut donors = self.donors.lock().unwrap();
        let donor = donors
            .iter_mut()
            .find(|d| d.id == completion.donor_credit.donor_id)
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(
                    completion.donor_credit.donor_id.clone(),
                ))
            })?;
        donor.total_donated += completion.donor_credit.amount;
        donor.donation_count += 1;
        if completion.donor_credit.mark_recurring {
            donor.is_recurring_donor = true;
        }

        if let Some(program_credit) = &completion.program_credit {
            let mut programs = self.programs.lock().unwrap();
            let program = programs
                .iter_mut()
                .find(|p| p.id == program_credit.program_id)
                .ok_or_else(|| {
                    Error::Database(DatabaseError::NotFound(program_credit.program_id.clone()))
                })?;
            program.raised_amount += program_credit.amount;
            program.donor_count += 1;
        }

        Ok(donation.clone())
    }

    fn search(
        &self,
        _filters: &DonationFilters,
        _page: i64,
        _page_size: i64,
    ) -> Result<(Vec<DonationWithRefs>, i64)> {
        unimplemented!()
    }

    fn list_completed(&self, filters: &DonationFilters) -> Result<Vec<DonationWithRefs>> {
        let donors = self.donors.lock().unwrap();
        let rows = self
            .donations
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.status == DonationStatus::Completed)
            .filter(|d| match filters.date_from {
                Some(from) => d.created_at.date() >= from,
                None => true,
            })
            .filter(|d| match filters.date_to {
                Some(to) => d.created_at.date() <= to,
                None => true,
            })
            .map(|d| {
                let donor = donors.iter().find(|dn| dn.id == d.donor_id);
                DonationWithRefs {
                    donation: d.clone(),
                    donor_name: donor.map(|dn| dn.name.clone()).unwrap_or_default(),
                    donor_email: donor.map(|dn| dn.email.clone()).unwrap_or_default(),
                    donor_phone: donor.and_then(|dn| dn.phone.clone()),
                    donor_pan_number: donor.and_then(|dn| dn.pan_number.clone()),
                    program_title: None,
                }
            })
            .collect();
        Ok(rows)
    }
}

// --- Mock gateway ---

#[derive(Clone, Default)]
struct MockGateway {
    orders: Arc<Mutex<Vec<(i64, String)>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockGateway {
    fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl PaymentGatewayTrait for MockGateway {
    async fn create_order(
        &self,
        amount_minor_units: i64,
        currency: &str,
        _receipt_note: &str,
    ) -> std::result::Result<GatewayOrder, GatewayError> {
        if *self.fail.lock().unwrap() {
            return Err(GatewayError::Rejected("order rejected".to_string()));
        }
        let mut orders = self.orders.lock().unwrap();
        orders.push((amount_minor_units, currency.to_string()));
        Ok(GatewayOrder {
            order_id: format!("order_test_{}", orders.len()),
            amount_minor_units,
            currency: currency.to_string(),
        })
    }
}

// --- Mock mailer ---

#[derive(Clone, Default)]
struct MockMailer {
    sent: Arc<Mutex<Vec<String>>>,
    fail: Arc<Mutex<bool>>,
}

#[async_trait]
impl ReceiptMailerTrait for MockMailer {
    async fn send_receipt(
        &self,
        _donor: &Donor,
        donation: &Donation,
        _program: Option<&Program>,
    ) -> std::result::Result<(), NotificationError> {
        if *self.fail.lock().unwrap() {
            return Err(NotificationError::SendFailed("smtp down".to_string()));
        }
        self.sent.lock().unwrap().push(donation.id.clone());
        Ok(())
    }
}

// --- Harness ---

struct Harness {
    service: DonationService,
    donors: MockDonorRepository,
    programs: MockProgramRepository,
    donations: MockDonationRepository,
    gateway: MockGateway,
    mailer: MockMailer,
}

fn build_harness() -> Harness {
    let donors = MockDonorRepository::default();
    let programs = MockProgramRepository::default();
    let donations = MockDonationRepository {
        donations: Arc::new(Mutex::new(Vec::new())),
        donors: donors.donors.clone(),
        programs: programs.programs.clone(),
    };
    let gateway = MockGateway::default();
    let mailer = MockMailer::default();

    let settings_service = Arc::new(SettingsService::new(Arc::new(MockSettingsRepository)));
    let service = DonationService::new(
        Arc::new(donations.clone()),
        Arc::new(donors.clone()),
        Arc::new(programs.clone()),
        settings_service,
        Arc::new(gateway.clone()),
        GatewayCredentials {
            key_id: KEY_ID.to_string(),
            key_secret: KEY_SECRET.to_string(),
        },
    )
    .with_mailer(Arc::new(mailer.clone()));

    Harness {
        service,
        donors,
        programs,
        donations,
        gateway,
        mailer,
    }
}

fn order_request(amount: Decimal) -> CreateOrderRequest {
    CreateOrderRequest {
        amount,
        donor_name: "Asha Rao".to_string(),
        donor_email: "asha@example.org".to_string(),
        donor_phone: Some("9876543210".to_string()),
        donor_address: None,
        pan_number: None,
        program_id: None,
        donation_type: DonationType::OneTime,
        is_anonymous: false,
        dedicated_to: None,
        campaign: None,
        notes: None,
    }
}

fn verify_request(order_id: &str, payment_id: &str, donation_id: &str) -> VerifyPaymentRequest {
    VerifyPaymentRequest {
        gateway_order_id: order_id.to_string(),
        gateway_payment_id: payment_id.to_string(),
        gateway_signature: signature::compute_signature(KEY_SECRET, order_id, payment_id),
        donation_id: donation_id.to_string(),
    }
}

// --- create_order ---

#[tokio::test]
async fn test_create_order_persists_pending_donation_and_donor() {
    let h = build_harness();

    let created = h.service.create_order(order_request(dec!(1000))).await.unwrap();

    assert_eq!(created.order_id, "order_test_1");
    assert_eq!(created.amount, 100_000);
    assert_eq!(created.currency, "INR");
    assert_eq!(created.key_id, KEY_ID);

    // Gateway saw minor units.
    assert_eq!(*h.gateway.orders.lock().unwrap(), vec![(100_000, "INR".to_string())]);

    // Donation persisted pending, in major units, with the order id.
    let donation = h.donations.get_by_id(&created.donation_id).unwrap();
    assert_eq!(donation.status, DonationStatus::Pending);
    assert_eq!(donation.amount, dec!(1000));
    assert_eq!(donation.gateway_order_id, "order_test_1");
    assert!(donation.transaction_id.is_none());

    // Donor created with zeroed aggregates.
    let donor = h.donors.get_by_email("asha@example.org").unwrap();
    assert_eq!(donor.total_donated, Decimal::ZERO);
    assert_eq!(donor.donation_count, 0);
}

#[tokio::test]
async fn test_create_order_rejects_non_positive_amount() {
    let h = build_harness();

    let err = h.service.create_order(order_request(dec!(0))).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Nothing persisted, gateway untouched.
    assert!(h.donors.donors.lock().unwrap().is_empty());
    assert!(h.donations.donations.lock().unwrap().is_empty());
    assert!(h.gateway.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_order_rejects_amount_below_minimum() {
    let h = build_harness();

    let err = h.service.create_order(order_request(dec!(0.5))).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_create_order_rejects_unknown_program() {
    let h = build_harness();

    let mut request = order_request(dec!(100));
    request.program_id = Some("missing-program".to_string());
    let err = h.service.create_order(request).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_create_order_upserts_donor_by_email() {
    let h = build_harness();

    h.service.create_order(order_request(dec!(100))).await.unwrap();

    let mut second = order_request(dec!(200));
    second.donor_email = " ASHA@example.org ".to_string();
    second.donor_phone = Some("1112223334".to_string());
    h.service.create_order(second).await.unwrap();

    let donors = h.donors.donors.lock().unwrap();
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0].phone.as_deref(), Some("1112223334"));
}

#[tokio::test]
async fn test_create_order_gateway_failure_persists_no_donation() {
    let h = build_harness();
    h.gateway.set_failing(true);

    let err = h.service.create_order(order_request(dec!(1000))).await.unwrap_err();
    assert!(matches!(err, Error::Gateway(_)));

    // The donor upsert ran first and its leftover is acceptable; no
    // donation may reference the failed order.
    assert_eq!(h.donors.donors.lock().unwrap().len(), 1);
    assert!(h.donations.donations.lock().unwrap().is_empty());
}

// --- verify_and_complete ---

#[tokio::test]
async fn test_verify_completes_and_credits_donor() {
    let h = build_harness();
    let created = h.service.create_order(order_request(dec!(1000))).await.unwrap();

    let receipt = h
        .service
        .verify_and_complete(verify_request(
            &created.order_id,
            "pay_123",
            &created.donation_id,
        ))
        .await
        .unwrap();

    assert!(receipt.receipt_number.starts_with("RCP-"));
    assert_eq!(receipt.amount, dec!(1000));
    assert_eq!(receipt.donation_id, created.donation_id);

    let donation = h.donations.get_by_id(&created.donation_id).unwrap();
    assert_eq!(donation.status, DonationStatus::Completed);
    assert_eq!(donation.transaction_id.as_deref(), Some("pay_123"));
    assert_eq!(donation.gateway_payment_id.as_deref(), Some("pay_123"));
    assert!(donation.receipt.is_some());

    let donor = h.donors.get_by_email("asha@example.org").unwrap();
    assert_eq!(donor.total_donated, dec!(1000));
    assert_eq!(donor.donation_count, 1);
    assert!(!donor.is_recurring_donor);

    assert_eq!(h.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_verify_rejects_tampered_signature() {
    let h = build_harness();
    let created = h.service.create_order(order_request(dec!(1000))).await.unwrap();

    let mut request = verify_request(&created.order_id, "pay_123", &created.donation_id);
    request.gateway_signature = signature::compute_signature(KEY_SECRET, &created.order_id, "pay_999");

    let err = h.service.verify_and_complete(request).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Donation(DonationError::SignatureMismatch)
    ));

    // Donation untouched, no credits, no email.
    let donation = h.donations.get_by_id(&created.donation_id).unwrap();
    assert_eq!(donation.status, DonationStatus::Pending);
    let donor = h.donors.get_by_email("asha@example.org").unwrap();
    assert_eq!(donor.total_donated, Decimal::ZERO);
    assert_eq!(donor.donation_count, 0);
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_verify_unknown_donation_is_not_found() {
    let h = build_harness();

    let err = h
        .service
        .verify_and_complete(verify_request("order_x", "pay_x", "no-such-donation"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
}

#[tokio::test]
async fn test_reverify_same_payload_is_idempotent() {
    let h = build_harness();
    let created = h.service.create_order(order_request(dec!(1000))).await.unwrap();
    let request = verify_request(&created.order_id, "pay_123", &created.donation_id);

    let first = h.service.verify_and_complete(request.clone()).await.unwrap();
    let second = h.service.verify_and_complete(request).await.unwrap();

    assert_eq!(first.receipt_number, second.receipt_number);

    // Aggregates moved exactly once.
    let donor = h.donors.get_by_email("asha@example.org").unwrap();
    assert_eq!(donor.total_donated, dec!(1000));
    assert_eq!(donor.donation_count, 1);
}

#[tokio::test]
async fn test_reverify_with_different_payload_is_rejected() {
    let h = build_harness();
    let created = h.service.create_order(order_request(dec!(1000))).await.unwrap();

    h.service
        .verify_and_complete(verify_request(
            &created.order_id,
            "pay_123",
            &created.donation_id,
        ))
        .await
        .unwrap();

    // Validly signed, but a different payment id than the recorded one.
    let err = h
        .service
        .verify_and_complete(verify_request(
            &created.order_id,
            "pay_456",
            &created.donation_id,
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Donation(DonationError::CompletedPayloadMismatch)
    ));

    let donor = h.donors.get_by_email("asha@example.org").unwrap();
    assert_eq!(donor.donation_count, 1);
}

#[tokio::test]
async fn test_recurring_donation_marks_donor() {
    let h = build_harness();

    let mut request = order_request(dec!(500));
    request.donation_type = DonationType::Monthly;
    let created = h.service.create_order(request).await.unwrap();

    h.service
        .verify_and_complete(verify_request(
            &created.order_id,
            "pay_m1",
            &created.donation_id,
        ))
        .await
        .unwrap();

    let donor = h.donors.get_by_email("asha@example.org").unwrap();
    assert!(donor.is_recurring_donor);
}

#[tokio::test]
async fn test_verify_credits_referenced_program() {
    let h = build_harness();
    h.programs.add_program("prog-1", "Clean Water");

    let mut request = order_request(dec!(750));
    request.program_id = Some("prog-1".to_string());
    let created = h.service.create_order(request).await.unwrap();

    h.service
        .verify_and_complete(verify_request(
            &created.order_id,
            "pay_p1",
            &created.donation_id,
        ))
        .await
        .unwrap();

    let program = h.programs.get_by_id("prog-1").unwrap();
    assert_eq!(program.raised_amount, dec!(750));
    assert_eq!(program.donor_count, 1);
}

#[tokio::test]
async fn test_verify_without_program_touches_no_program() {
    let h = build_harness();
    h.programs.add_program("prog-1", "Clean Water");

    let created = h.service.create_order(order_request(dec!(300))).await.unwrap();
    h.service
        .verify_and_complete(verify_request(
            &created.order_id,
            "pay_np",
            &created.donation_id,
        ))
        .await
        .unwrap();

    let program = h.programs.get_by_id("prog-1").unwrap();
    assert_eq!(program.raised_amount, Decimal::ZERO);
    assert_eq!(program.donor_count, 0);
}

#[tokio::test]
async fn test_mailer_failure_does_not_roll_back_completion() {
    let h = build_harness();
    *h.mailer.fail.lock().unwrap() = true;

    let created = h.service.create_order(order_request(dec!(1000))).await.unwrap();
    let receipt = h
        .service
        .verify_and_complete(verify_request(
            &created.order_id,
            "pay_mf",
            &created.donation_id,
        ))
        .await
        .unwrap();

    assert!(receipt.receipt_number.starts_with("RCP-"));
    let donation = h.donations.get_by_id(&created.donation_id).unwrap();
    assert_eq!(donation.status, DonationStatus::Completed);
}
