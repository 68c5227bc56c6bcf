//! # CSV Export Layout
//!
//! One layout serves two purposes: the `/download` attachment, and the
//! flat file that held every sale before the shop moved to SQLite. Files
//! in that older format load back through [`read_sales_csv`].
//!
//! ```text
//! Data,Hora,Cliente,Barbeiro,Cabelo,Barba,Sobrancelha,Produto,Valor Produto,Desconto,Total
//! 14/10/2026,09:30,João,vini,35.00,20.00,0.00,,0.00,5.00,50.00
//! ```

use chrono::{NaiveDate, NaiveTime};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Sale, SaleDraft};
use crate::validation::{
    normalize_username, parse_date, validate_amount, validate_client_name, validate_product_name,
};

/// Header row, in column order.
pub const SALES_CSV_HEADERS: [&str; 11] = [
    "Data",
    "Hora",
    "Cliente",
    "Barbeiro",
    "Cabelo",
    "Barba",
    "Sobrancelha",
    "Produto",
    "Valor Produto",
    "Desconto",
    "Total",
];

/// Attachment name for a user's download.
pub fn export_file_name(username: &str) -> String {
    format!("vendas_{}.csv", username)
}

// =============================================================================
// Writing
// =============================================================================

/// Encodes sales as CSV, header first, in the order given.
///
/// Dates are `DD/MM/YYYY`, amounts have two decimals, a missing product is
/// an empty cell. Lines end with CRLF.
pub fn write_sales_csv(sales: &[Sale]) -> CoreResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(SALES_CSV_HEADERS)?;

    for sale in sales {
        writer.write_record([
            sale.sale_date.format("%d/%m/%Y").to_string(),
            sale.sale_time.clone(),
            sale.client.clone(),
            sale.barber.clone(),
            sale.haircut.to_string(),
            sale.beard.to_string(),
            sale.eyebrow.to_string(),
            sale.product_name.clone().unwrap_or_default(),
            sale.product_price.to_string(),
            sale.discount.to_string(),
            sale.total.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| CoreError::Csv(e.to_string()))
}

// =============================================================================
// Reading
// =============================================================================

/// A row recovered from a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSale {
    pub sale_date: NaiveDate,
    pub sale_time: String,
    pub draft: SaleDraft,
    /// Total as written in the file, kept even if it disagrees with the
    /// recomputed one.
    pub total: Money,
}

/// Outcome of parsing a CSV file.
#[derive(Debug, Default)]
pub struct CsvImport {
    pub sales: Vec<ImportedSale>,
    /// 1-based line number and reason for each skipped row.
    pub rejected: Vec<(u64, ValidationError)>,
}

/// Parses a file in the export layout.
///
/// A wrong header or broken CSV framing fails the whole file. A row that
/// would not pass the register form (bad date or time, negative or oversized
/// amount, overlong name) is skipped and reported in [`CsvImport::rejected`].
pub fn read_sales_csv(data: &[u8]) -> CoreResult<CsvImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let matches = headers.len() == SALES_CSV_HEADERS.len()
        && headers
            .iter()
            .zip(SALES_CSV_HEADERS)
            .all(|(got, want)| got.eq_ignore_ascii_case(want));
    if !matches {
        return Err(CoreError::Csv(format!(
            "unexpected header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut import = CsvImport::default();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        match parse_row(&record) {
            Ok(sale) => import.sales.push(sale),
            Err(err) => import.rejected.push((line, err)),
        }
    }

    Ok(import)
}

fn parse_row(record: &csv::StringRecord) -> Result<ImportedSale, ValidationError> {
    if record.len() != SALES_CSV_HEADERS.len() {
        return Err(ValidationError::InvalidFormat {
            field: "linha".to_string(),
            reason: format!(
                "expected {} columns, found {}",
                SALES_CSV_HEADERS.len(),
                record.len()
            ),
        });
    }

    let col = |i: usize| record.get(i).unwrap_or_default();
    let amount = |i: usize| {
        let field = SALES_CSV_HEADERS[i];
        validate_amount(field, Money::parse_strict(field, col(i))?)
    };

    let barber = normalize_username(col(3));
    if barber.is_empty() {
        return Err(ValidationError::Required {
            field: "Barbeiro".to_string(),
        });
    }

    let sale_time = match col(1) {
        "" => "00:00".to_string(),
        t => NaiveTime::parse_from_str(t, "%H:%M")
            .map_err(|_| ValidationError::InvalidFormat {
                field: "Hora".to_string(),
                reason: format!("expected HH:MM, got {:?}", t),
            })?
            .format("%H:%M")
            .to_string(),
    };

    Ok(ImportedSale {
        sale_date: parse_date("Data", col(0))?,
        sale_time,
        draft: SaleDraft {
            client: validate_client_name(col(2))?,
            barber,
            haircut: amount(4)?,
            beard: amount(5)?,
            eyebrow: amount(6)?,
            product_name: validate_product_name(col(7))?,
            product_price: amount(8)?,
            discount: amount(9)?,
        },
        total: amount(10)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sale(product: Option<&str>, client: &str) -> Sale {
        Sale {
            id: "5a1f0d3e-0000-4000-8000-000000000001".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 14, 12, 30, 0).unwrap(),
            sale_date: NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
            sale_time: "09:30".to_string(),
            client: client.to_string(),
            barber: "vini".to_string(),
            haircut: Money::from_cents(3500),
            beard: Money::from_cents(2000),
            eyebrow: Money::zero(),
            product_name: product.map(str::to_string),
            product_price: Money::from_cents(1990),
            discount: Money::from_cents(500),
            total: Money::from_cents(6990),
            deleted_at: None,
        }
    }

    #[test]
    fn test_write_layout() {
        let bytes = write_sales_csv(&[sale(None, "João")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.split("\r\n");

        assert_eq!(
            lines.next().unwrap(),
            "Data,Hora,Cliente,Barbeiro,Cabelo,Barba,Sobrancelha,Produto,Valor Produto,Desconto,Total"
        );
        assert_eq!(
            lines.next().unwrap(),
            "14/10/2026,09:30,João,vini,35.00,20.00,0.00,,19.90,5.00,69.90"
        );
        assert_eq!(lines.next(), Some(""));
    }

    #[test]
    fn test_write_quotes_commas_in_names() {
        let bytes = write_sales_csv(&[sale(Some("Gel de cabelo"), "Silva, Ana")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Silva, Ana\""));
        assert!(text.contains(",Gel de cabelo,"));
    }

    #[test]
    fn test_header_only_when_empty() {
        let bytes = write_sales_csv(&[]).unwrap();
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn test_read_exported_file() {
        let bytes = write_sales_csv(&[sale(Some("Xampu"), "Ana")]).unwrap();
        let import = read_sales_csv(&bytes).unwrap();

        assert!(import.rejected.is_empty());
        let row = &import.sales[0];
        assert_eq!(row.sale_date, NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        assert_eq!(row.draft.barber, "vini");
        assert_eq!(row.draft.product_name.as_deref(), Some("Xampu"));
        assert_eq!(row.total, Money::from_cents(6990));
    }

    #[test]
    fn test_read_legacy_rows_with_comma_decimals_and_bad_lines() {
        let data = "Data,Hora,Cliente,Barbeiro,Cabelo,Barba,Sobrancelha,Produto,Valor Produto,Desconto,Total\n\
                    2026-09-01,,Caio,Artur,\"30,00\",0,0,,0,0,\"30,00\"\n\
                    32/09/2026,10:00,Bia,artur,30,0,0,,0,0,30\n\
                    02/09/2026,11:00,Rui,artur,trinta,0,0,,0,0,30\n";
        let import = read_sales_csv(data.as_bytes()).unwrap();

        assert_eq!(import.sales.len(), 1);
        assert_eq!(import.sales[0].sale_time, "00:00");
        assert_eq!(import.sales[0].draft.barber, "artur");
        assert_eq!(import.sales[0].draft.haircut.cents(), 3000);

        let lines: Vec<u64> = import.rejected.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_read_rejects_rows_the_register_form_would_refuse() {
        let long_client = "x".repeat(crate::MAX_TEXT_LEN + 1);
        let data = format!(
            "Data,Hora,Cliente,Barbeiro,Cabelo,Barba,Sobrancelha,Produto,Valor Produto,Desconto,Total\n\
             01/09/2026,9:05,Caio,artur,30,0,0,,0,0,30\n\
             01/09/2026,10:00,Bia,artur,-30,0,0,,0,0,-30\n\
             01/09/2026,banana,Rui,artur,30,0,0,,0,0,30\n\
             01/09/2026,25:00,Rui,artur,30,0,0,,0,0,30\n\
             01/09/2026,11:00,{long_client},artur,30,0,0,,0,0,30\n\
             01/09/2026,12:00,Lia,artur,2000000,0,0,,0,0,2000000\n"
        );
        let import = read_sales_csv(data.as_bytes()).unwrap();

        assert_eq!(import.sales.len(), 1);
        assert_eq!(import.sales[0].sale_time, "09:05");

        let lines: Vec<u64> = import.rejected.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6, 7]);
        assert!(matches!(
            import.rejected[0].1,
            ValidationError::MustBeNonNegative { .. }
        ));
        assert!(matches!(
            &import.rejected[1].1,
            ValidationError::InvalidFormat { field, .. } if field == "Hora"
        ));
        assert!(matches!(
            import.rejected[3].1,
            ValidationError::TooLong { .. }
        ));
        assert!(matches!(
            import.rejected[4].1,
            ValidationError::TooLarge { .. }
        ));
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let err = read_sales_csv(b"date,amount\n2026-01-01,10\n").unwrap_err();
        assert!(matches!(err, CoreError::Csv(_)));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("mairon"), "vendas_mairon.csv");
    }
}
