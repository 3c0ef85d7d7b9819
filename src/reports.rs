use crate::models::{
    AppData, DoseStatus, FinancialReport, FinancialReportRow, MedicationReportRow, QualityReport,
    QualityReportRow, ScheduleStatus,
};
use crate::schedule::medication_name;
use chrono::{Duration, Local, NaiveDate};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid money amount: {0:?}")]
pub struct MoneyParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Medication,
    Financial,
    Quality,
}

impl std::str::FromStr for ReportKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medication" => Ok(Self::Medication),
            "financial" => Ok(Self::Financial),
            "quality" => Ok(Self::Quality),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medication => write!(f, "medication"),
            Self::Financial => write!(f, "financial"),
            Self::Quality => write!(f, "quality"),
        }
    }
}

/// Report range: explicit bounds, defaulting to the last seven days.
pub fn resolve_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let today = Local::now().date_naive();
    (start.unwrap_or(today - Duration::days(7)), end.unwrap_or(today))
}

fn in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

/// One row per resolved (non-pending) schedule in the range.
pub fn build_medication_report(
    data: &AppData,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<MedicationReportRow> {
    data.schedules
        .iter()
        .filter(|schedule| in_range(schedule.date, start, end))
        .filter_map(|schedule| {
            let status = match schedule.status {
                ScheduleStatus::Completed => DoseStatus::Taken,
                ScheduleStatus::Missed => DoseStatus::Missed,
                ScheduleStatus::Pending => return None,
            };
            let dosage = data
                .medications
                .iter()
                .find(|medication| medication.id == schedule.medication_id)
                .map(|medication| medication.dosage.clone())
                .unwrap_or_default();
            Some(MedicationReportRow {
                schedule_id: schedule.id,
                name: medication_name(data, schedule.medication_id),
                dosage,
                date: schedule.date,
                time: schedule.time.clone(),
                status,
                reason: schedule.missed_reason.clone(),
            })
        })
        .collect()
}

/// Adherence per medication: taken and missed doses count, pending ones
/// are not doses yet. The rate is 100 * taken / (taken + missed), zero
/// when the medication has no resolved doses.
pub fn build_quality_report(data: &AppData, start: NaiveDate, end: NaiveDate) -> QualityReport {
    let mut counts: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for schedule in &data.schedules {
        if !in_range(schedule.date, start, end) || schedule.status == ScheduleStatus::Pending {
            continue;
        }
        let entry = counts
            .entry(medication_name(data, schedule.medication_id))
            .or_default();
        if schedule.status == ScheduleStatus::Completed {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let rows: Vec<QualityReportRow> = counts
        .into_iter()
        .map(|(medication_name, (taken, missed))| {
            let total = taken + missed;
            QualityReportRow {
                medication_name,
                total_doses: total,
                taken_doses: taken,
                missed_doses: missed,
                adherence_rate: adherence_rate(taken, total),
            }
        })
        .collect();

    let total_taken = rows.iter().map(|row| row.taken_doses).sum();
    let total_missed = rows.iter().map(|row| row.missed_doses).sum();
    let average_adherence = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|row| row.adherence_rate).sum::<f64>() / rows.len() as f64
    };

    QualityReport {
        rows,
        average_adherence,
        total_taken,
        total_missed,
    }
}

pub fn adherence_rate(taken: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(taken) / f64::from(total) * 100.0
    }
}

/// Purchases in range with exact cent arithmetic for the totals.
pub fn build_financial_report(
    data: &AppData,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<FinancialReport, MoneyParseError> {
    let mut rows = Vec::new();
    let mut grand_total = 0i64;
    for purchase in &data.purchases {
        if !in_range(purchase.date, start, end) {
            continue;
        }
        let unit_cents = parse_money(&purchase.unit_price)?;
        let row_cents = unit_cents * i64::from(purchase.quantity);
        grand_total += row_cents;
        rows.push(FinancialReportRow {
            purchase_id: purchase.id,
            medication_name: purchase.medication_name.clone(),
            unit_price: format_money(unit_cents),
            pharmacy: purchase.pharmacy.clone(),
            date: purchase.date,
            quantity: purchase.quantity,
            total: format_money(row_cents),
        });
    }

    Ok(FinancialReport {
        rows,
        grand_total: format_money(grand_total),
    })
}

/// Parses amounts like "R$ 12,90" (comma decimal separator, optional
/// "R$" prefix and "." thousands separators) into cents.
pub fn parse_money(raw: &str) -> Result<i64, MoneyParseError> {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix("R$").unwrap_or(cleaned).trim();
    let cleaned = cleaned.replace('.', "");

    let (whole, cents) = match cleaned.split_once(',') {
        Some((whole, frac)) => (whole, frac),
        None => (cleaned.as_str(), ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyParseError(raw.to_string()));
    }
    if cents.len() > 2 || !cents.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyParseError(raw.to_string()));
    }

    let whole: i64 = whole.parse().map_err(|_| MoneyParseError(raw.to_string()))?;
    let cents: i64 = if cents.is_empty() {
        0
    } else if cents.len() == 1 {
        cents.parse::<i64>().map_err(|_| MoneyParseError(raw.to_string()))? * 10
    } else {
        cents.parse().map_err(|_| MoneyParseError(raw.to_string()))?
    };

    Ok(whole * 100 + cents)
}

pub fn format_money(cents: i64) -> String {
    format!("R$ {},{:02}", cents / 100, cents % 100)
}
