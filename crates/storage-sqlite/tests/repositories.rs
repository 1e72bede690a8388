//! Repository integration tests against a temporary SQLite database.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use seva_core::donations::{
    DonationCompletion, DonationRepositoryTrait, DonationStatus, DonationType, DonorCredit,
    NewDonation, ProgramCredit, Receipt,
};
use seva_core::donors::{DonorProfile, DonorRepositoryTrait};
use seva_core::programs::{NewProgram, ProgramRepositoryTrait};
use seva_core::reporting::DonationFilters;
use seva_core::settings::{Settings, SettingsRepositoryTrait, SettingsUpdate};
use seva_storage_sqlite::donations::DonationRepository;
use seva_storage_sqlite::donors::DonorRepository;
use seva_storage_sqlite::programs::ProgramRepository;
use seva_storage_sqlite::settings::SettingsRepository;
use seva_storage_sqlite::{create_pool, run_migrations, spawn_writer, DbPool, WriteHandle};

struct TestDb {
    // Keeps the database file alive for the duration of the test.
    _dir: tempfile::TempDir,
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn setup() -> TestDb {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = create_pool(db_path.to_str().unwrap()).unwrap();
    run_migrations(&pool).unwrap();
    let writer = spawn_writer((*pool).clone());
    TestDb {
        _dir: dir,
        pool,
        writer,
    }
}

fn profile(email: &str) -> DonorProfile {
    DonorProfile {
        email: email.to_string(),
        name: "Asha Rao".to_string(),
        phone: Some("9876543210".to_string()),
        address: None,
        pan_number: Some("ABCDE1234F".to_string()),
    }
}

fn pending_donation(donor_id: &str, program_id: Option<String>, order: &str) -> NewDonation {
    NewDonation {
        donor_id: donor_id.to_string(),
        program_id,
        amount: dec!(1000),
        currency: "INR".to_string(),
        donation_type: DonationType::OneTime,
        gateway_order_id: order.to_string(),
        is_anonymous: false,
        dedicated_to: None,
        campaign: None,
        notes: None,
    }
}

fn receipt(number: &str) -> Receipt {
    Receipt {
        number: number.to_string(),
        generated_at: Utc::now().naive_utc(),
    }
}

#[tokio::test]
async fn test_donor_upsert_is_idempotent_on_email() {
    let db = setup();
    let repo = DonorRepository::new(db.pool.clone(), db.writer.clone());

    let first = repo.upsert_by_email(profile("asha@example.org")).await.unwrap();

    let mut changed = profile("asha@example.org");
    changed.phone = Some("1112223334".to_string());
    let second = repo.upsert_by_email(changed).await.unwrap();

    // Same row, overwritten contact field, untouched aggregates.
    assert_eq!(first.id, second.id);
    assert_eq!(second.phone.as_deref(), Some("1112223334"));
    assert_eq!(second.total_donated, dec!(0));
    assert_eq!(second.donation_count, 0);

    let (page, total) = repo.list(1, 10).unwrap();
    assert_eq!(total, 1);
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_complete_and_credit_updates_all_three_tables() {
    let db = setup();
    let donor_repo = DonorRepository::new(db.pool.clone(), db.writer.clone());
    let program_repo = ProgramRepository::new(db.pool.clone(), db.writer.clone());
    let donation_repo = DonationRepository::new(db.pool.clone(), db.writer.clone());

    let donor = donor_repo.upsert_by_email(profile("asha@example.org")).await.unwrap();
    let program = program_repo
        .create(NewProgram {
            id: None,
            title: "Clean Water".to_string(),
            description: None,
            is_active: true,
        })
        .await
        .unwrap();

    let donation = donation_repo
        .create(pending_donation(&donor.id, Some(program.id.clone()), "order_1"))
        .await
        .unwrap();
    assert_eq!(donation.status, DonationStatus::Pending);

    let completed = donation_repo
        .complete_and_credit(DonationCompletion {
            donation_id: donation.id.clone(),
            gateway_payment_id: "pay_1".to_string(),
            gateway_signature: "sig_1".to_string(),
            receipt: receipt("RCP-1700000000000"),
            donor_credit: DonorCredit {
                donor_id: donor.id.clone(),
                amount: dec!(1000),
                mark_recurring: false,
            },
            program_credit: Some(ProgramCredit {
                program_id: program.id.clone(),
                amount: dec!(1000),
            }),
        })
        .await
        .unwrap();

    assert_eq!(completed.status, DonationStatus::Completed);
    assert_eq!(completed.transaction_id.as_deref(), Some("pay_1"));
    assert_eq!(
        completed.receipt.as_ref().map(|r| r.number.as_str()),
        Some("RCP-1700000000000")
    );

    let donor = donor_repo.get_by_id(&donor.id).unwrap();
    assert_eq!(donor.total_donated, dec!(1000));
    assert_eq!(donor.donation_count, 1);
    assert!(!donor.is_recurring_donor);

    let program = program_repo.get_by_id(&program.id).unwrap();
    assert_eq!(program.raised_amount, dec!(1000));
    assert_eq!(program.donor_count, 1);
}

#[tokio::test]
async fn test_recurring_credit_marks_donor() {
    let db = setup();
    let donor_repo = DonorRepository::new(db.pool.clone(), db.writer.clone());
    let donation_repo = DonationRepository::new(db.pool.clone(), db.writer.clone());

    let donor = donor_repo.upsert_by_email(profile("monthly@example.org")).await.unwrap();
    let mut new_donation = pending_donation(&donor.id, None, "order_m");
    new_donation.donation_type = DonationType::Monthly;
    let donation = donation_repo.create(new_donation).await.unwrap();

    donation_repo
        .complete_and_credit(DonationCompletion {
            donation_id: donation.id,
            gateway_payment_id: "pay_m".to_string(),
            gateway_signature: "sig_m".to_string(),
            receipt: receipt("RCP-1700000000001"),
            donor_credit: DonorCredit {
                donor_id: donor.id.clone(),
                amount: dec!(1000),
                mark_recurring: true,
            },
            program_credit: None,
        })
        .await
        .unwrap();

    let donor = donor_repo.get_by_id(&donor.id).unwrap();
    assert!(donor.is_recurring_donor);
}

#[tokio::test]
async fn test_search_filters_by_status_and_paginates() {
    let db = setup();
    let donor_repo = DonorRepository::new(db.pool.clone(), db.writer.clone());
    let donation_repo = DonationRepository::new(db.pool.clone(), db.writer.clone());

    let donor = donor_repo.upsert_by_email(profile("many@example.org")).await.unwrap();
    for i in 0..3 {
        donation_repo
            .create(pending_donation(&donor.id, None, &format!("order_{i}")))
            .await
            .unwrap();
    }
    let extra = donation_repo
        .create(pending_donation(&donor.id, None, "order_done"))
        .await
        .unwrap();
    donation_repo
        .complete_and_credit(DonationCompletion {
            donation_id: extra.id.clone(),
            gateway_payment_id: "pay_done".to_string(),
            gateway_signature: "sig_done".to_string(),
            receipt: receipt("RCP-1700000000002"),
            donor_credit: DonorCredit {
                donor_id: donor.id.clone(),
                amount: dec!(1000),
                mark_recurring: false,
            },
            program_credit: None,
        })
        .await
        .unwrap();

    let pending_filters = DonationFilters {
        status: Some(DonationStatus::Pending),
        ..Default::default()
    };
    let (rows, total) = donation_repo.search(&pending_filters, 1, 2).unwrap();
    assert_eq!(total, 3);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.donation.status == DonationStatus::Pending));
    assert!(rows.iter().all(|r| r.donor_email == "many@example.org"));

    let completed = donation_repo.list_completed(&DonationFilters::default()).unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].donation.id, extra.id);
}

#[tokio::test]
async fn test_settings_defaults_and_overrides() {
    let db = setup();
    let repo = SettingsRepository::new(db.pool.clone(), db.writer.clone());

    // No rows: compiled-in defaults.
    let settings = repo.get_settings().unwrap();
    assert_eq!(settings, Settings::default());

    repo.update_settings(&SettingsUpdate {
        organization_name: Some("Helping Hands".to_string()),
        min_donation_amount: Some(dec!(50)),
        ..Default::default()
    })
    .await
    .unwrap();

    let settings = repo.get_settings().unwrap();
    assert_eq!(settings.organization_name, "Helping Hands");
    assert_eq!(settings.min_donation_amount, dec!(50));
    // Fields without overrides keep their defaults.
    assert_eq!(settings.currency, "INR");
    assert_eq!(settings.receipt_prefix, "RCP");
}
