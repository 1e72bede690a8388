//! CSV serialization for donation exports.

use csv::{QuoteStyle, WriterBuilder};

use super::reporting_model::DonationWithRefs;
use crate::errors::{Error, Result};

const HEADERS: [&str; 10] = [
    "Receipt No",
    "Donor Name",
    "Email",
    "Phone",
    "PAN",
    "Amount",
    "Type",
    "Program",
    "Transaction ID",
    "Date",
];

/// Serializes donation rows to CSV with the fixed export column order.
///
/// Every field is double-quote wrapped; embedded quotes are escaped by
/// doubling, per RFC 4180.
pub fn write_donations_csv(rows: &[DonationWithRefs]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(HEADERS)
        .map_err(|e| Error::Unexpected(format!("CSV write failed: {}", e)))?;

    for row in rows {
        let donation = &row.donation;
        let receipt_number = donation
            .receipt
            .as_ref()
            .map(|r| r.number.clone())
            .unwrap_or_default();
        let date = donation
            .receipt
            .as_ref()
            .map(|r| r.generated_at.date())
            .unwrap_or_else(|| donation.created_at.date())
            .format("%Y-%m-%d")
            .to_string();

        writer
            .write_record([
                receipt_number.as_str(),
                row.donor_name.as_str(),
                row.donor_email.as_str(),
                row.donor_phone.as_deref().unwrap_or(""),
                row.donor_pan_number.as_deref().unwrap_or(""),
                &donation.amount.to_string(),
                donation.donation_type.as_str(),
                row.program_title.as_deref().unwrap_or(""),
                donation.transaction_id.as_deref().unwrap_or(""),
                date.as_str(),
            ])
            .map_err(|e| Error::Unexpected(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("CSV write failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Unexpected(format!("CSV write failed: {}", e)))
}
