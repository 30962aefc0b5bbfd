use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::*;

use crate::error::Result;
use crate::models::placement::{PaymentStatus, Placement};
use crate::models::settings::AppSettings;

/// One ledger line: the placement and the candidate name resolved for it.
pub struct LedgerRow<'a> {
    pub placement: &'a Placement,
    pub candidate_name: &'a str,
}

pub struct ExportService;

impl ExportService {
    fn money(value: Decimal) -> f64 {
        value.round_dp(2).to_f64().unwrap_or(0.0)
    }

    fn date(value: Option<NaiveDate>) -> String {
        value
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Commission ledger as a styled XLSX workbook. Payment status is shown as
    /// of `today`, so overdue commissions are flagged.
    pub fn generate_commission_xlsx(
        rows: &[LedgerRow<'_>],
        settings: &AppSettings,
        today: NaiveDate,
    ) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Commissions")?;

        let primary_color = Color::RGB(0x1E3A8A);
        let header_bg = Color::RGB(0x0F172A);
        let alt_row_1 = Color::RGB(0xF8FAFC);
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0);

        let status_pending = Color::RGB(0xF59E0B);
        let status_overdue = Color::RGB(0xEF4444);
        let status_paid = Color::RGB(0x10B981);

        let columns = [
            ("#", 6.0),
            ("Candidate", 28.0),
            ("Company", 28.0),
            ("Job Role", 24.0),
            ("Joining Date", 14.0),
            ("Salary", 14.0),
            ("Commission", 14.0),
            ("Due Date", 14.0),
            ("Status", 12.0),
        ];
        let last_col = (columns.len() - 1) as u16;
        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 36)?;
        let title = format!("{} - Commission Ledger", settings.agency_name);
        worksheet.merge_range(0, 0, 0, last_col, &title, &title_format)?;

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0xCBD5E1))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(1, 20)?;
        let subtitle = format!(
            "As of {}  |  Placements: {}  |  Commission rate: {}%",
            today.format("%Y-%m-%d"),
            rows.len(),
            settings.commission_percent.normalize()
        );
        worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(Color::White)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 2;
        worksheet.set_row_height(header_row, 26)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        let data_start_row = 3;
        for (idx, line) in rows.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let p = line.placement;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
            let money_fmt = base_fmt.clone().set_num_format("#,##0.00");

            worksheet.write_number_with_format(row, 0, (idx + 1) as f64, &center_fmt)?;
            worksheet.write_string_with_format(row, 1, line.candidate_name, &base_fmt.clone().set_bold())?;
            worksheet.write_string_with_format(row, 2, &p.company_name, &base_fmt)?;
            worksheet.write_string_with_format(row, 3, &p.job_role, &base_fmt)?;
            worksheet.write_string_with_format(row, 4, Self::date(p.joining_date), &center_fmt)?;
            worksheet.write_number_with_format(row, 5, Self::money(p.salary), &money_fmt)?;
            worksheet.write_number_with_format(row, 6, Self::money(p.commission_amount), &money_fmt)?;
            worksheet.write_string_with_format(row, 7, Self::date(p.commission_due_date), &center_fmt)?;

            let status = p.effective_payment_status(today);
            let status_color = match status {
                PaymentStatus::Pending => status_pending,
                PaymentStatus::Overdue => status_overdue,
                PaymentStatus::Paid => status_paid,
            };
            let status_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(status_color)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(row, 8, status.as_str(), &status_fmt)?;
        }

        let total_row = data_start_row + rows.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let total_money_fmt = summary_fmt.clone().set_num_format("#,##0.00");

        let total = |paid: Option<bool>| -> Decimal {
            rows.iter()
                .map(|r| r.placement)
                .filter(|p| paid.map_or(true, |paid| (p.payment_status == PaymentStatus::Paid) == paid))
                .map(|p| p.commission_amount)
                .sum()
        };

        worksheet.set_row_height(total_row, 24)?;
        worksheet.merge_range(total_row, 0, total_row, 5, "Total commission", &summary_fmt)?;
        worksheet.write_number_with_format(total_row, 6, Self::money(total(None)), &total_money_fmt)?;
        let split = format!(
            "Collected: {}  |  Outstanding: {}",
            total(Some(true)).round_dp(2),
            total(Some(false)).round_dp(2)
        );
        worksheet.merge_range(total_row, 7, total_row, last_col, &split, &summary_fmt)?;

        worksheet.set_freeze_panes(3, 0)?;
        worksheet.autofilter(
            2,
            0,
            (data_start_row + rows.len() as u32).saturating_sub(1).max(2),
            last_col,
        )?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_is_a_zip_archive() {
        let placement = Placement {
            id: "p1".into(),
            candidate_id: "c1".into(),
            company_name: "Himalayan Java".into(),
            job_role: "Barista".into(),
            salary: Decimal::new(2200050, 2),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            commission_amount: Decimal::new(220005, 2),
            commission_due_date: NaiveDate::from_ymd_opt(2024, 2, 9),
            payment_status: PaymentStatus::Pending,
        };
        let rows = [LedgerRow {
            placement: &placement,
            candidate_name: "Sunita Magar",
        }];
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bytes =
            ExportService::generate_commission_xlsx(&rows, &AppSettings::default(), today).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let empty = ExportService::generate_commission_xlsx(&[], &AppSettings::default(), today).unwrap();
        assert!(!empty.is_empty());
    }
}
