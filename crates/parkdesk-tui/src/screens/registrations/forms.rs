//! Modal forms for the registrations screen: layout per mode and parsing
//! of the submitted text into core requests.

use chrono::NaiveDate;

use parkdesk_core::messages;
use parkdesk_core::{
    CoreError, CreateRegistrationRequest, ExistingUserRequest, ExtendRegistrationRequest,
    RecordId, Registration, UiMode, UpdateRegistrationRequest,
};

use crate::widgets::form::Form;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The form a modal opens with, or `None` for read-only modals.
pub fn form_for(mode: &UiMode, row: Option<&Registration>) -> Option<Form> {
    let form = match mode {
        UiMode::Add => Form::new(&[
            ("Biển số", ""),
            ("Số tháng", "1"),
            ("Mã khách hàng", ""),
            ("Ngày bắt đầu", ""),
            ("Số tiền", ""),
            ("Ghi chú", ""),
        ]),
        UiMode::ExistingUser => Form::new(&[
            ("Mã khách hàng", ""),
            ("CCCD", ""),
            ("Biển số", ""),
            ("Số tháng", "1"),
            ("Ghi chú", ""),
        ]),
        UiMode::Edit(_) => {
            let start = row
                .and_then(|r| r.starts_at)
                .map(|d| d.date_naive().format(DATE_FORMAT).to_string())
                .unwrap_or_default();
            let amount = row
                .and_then(|r| r.amount)
                .map(|a| a.to_string())
                .unwrap_or_default();
            let note = row.and_then(|r| r.note.clone()).unwrap_or_default();
            Form::new(&[
                ("Ngày bắt đầu", start.as_str()),
                ("Số tiền", amount.as_str()),
                ("Ghi chú", note.as_str()),
            ])
        }
        UiMode::Extend(_) | UiMode::SmartExtend(_) => {
            Form::new(&[("Số tháng", "1"), ("Ghi chú", "")])
        }
        UiMode::UpdateMonths(_) => {
            let months = row.map(|r| r.months.to_string()).unwrap_or_default();
            Form::new(&[("Số tháng", months.as_str())])
        }
        UiMode::CheckActive => Form::new(&[("Biển số", "")]),
        _ => return None,
    };
    Some(form)
}

// ── Field parsing ────────────────────────────────────────────────────

pub fn months(text: &str) -> Result<u32, CoreError> {
    text.parse()
        .map_err(|_| CoreError::validation(messages::MONTHS_RANGE))
}

fn opt_date(text: Option<String>) -> Result<Option<NaiveDate>, CoreError> {
    text.map(|t| {
        NaiveDate::parse_from_str(&t, DATE_FORMAT)
            .map_err(|_| CoreError::validation(format!("Ngày không hợp lệ: {t} (YYYY-MM-DD)")))
    })
    .transpose()
}

fn opt_amount(text: Option<String>) -> Result<Option<f64>, CoreError> {
    text.map(|t| {
        t.replace(['.', ','], "")
            .parse::<f64>()
            .map_err(|_| CoreError::validation(messages::AMOUNT_INVALID))
    })
    .transpose()
}

fn opt_id(text: Option<String>) -> Option<RecordId> {
    text.and_then(|t| t.parse().ok())
}

// ── Requests ─────────────────────────────────────────────────────────

pub fn create(form: &Form) -> Result<CreateRegistrationRequest, CoreError> {
    let request = CreateRegistrationRequest {
        plate: form.value(0).to_owned(),
        months: months(form.value(1))?,
        user_id: opt_id(form.opt(2)),
        starts_on: opt_date(form.opt(3))?,
        amount: opt_amount(form.opt(4))?,
        note: form.opt(5),
    };
    request.validate()?;
    Ok(request)
}

pub fn existing_user(form: &Form) -> Result<ExistingUserRequest, CoreError> {
    let request = ExistingUserRequest {
        user_id: opt_id(form.opt(0)),
        cccd: form.opt(1),
        plate: form.value(2).to_owned(),
        months: months(form.value(3))?,
        note: form.opt(4),
    };
    request.validate()?;
    Ok(request)
}

/// Only fields that differ from the row are sent.
pub fn update(form: &Form, row: &Registration) -> Result<UpdateRegistrationRequest, CoreError> {
    let starts_on = opt_date(form.opt(0))?
        .filter(|d| row.starts_at.is_none_or(|s| s.date_naive() != *d));
    let amount = opt_amount(form.opt(1))?.filter(|a| row.amount != Some(*a));
    let note = form.opt(2).filter(|n| row.note.as_deref() != Some(n.as_str()));
    let request = UpdateRegistrationRequest {
        starts_on,
        amount,
        note,
    };
    request.validate()?;
    Ok(request)
}

pub fn extend(form: &Form) -> Result<ExtendRegistrationRequest, CoreError> {
    let request = ExtendRegistrationRequest {
        months: months(form.value(0))?,
        note: form.opt(1),
    };
    request.validate()?;
    Ok(request)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn typed(mut form: Form, fields: &[&str]) -> Form {
        for (i, text) in fields.iter().enumerate() {
            if i > 0 {
                form.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
            }
            form.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
            for c in text.chars() {
                form.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            }
        }
        form
    }

    #[test]
    fn add_form_builds_a_request() {
        let form = typed(
            form_for(&UiMode::Add, None).unwrap(),
            &["51A-123.45", "3", "7", "2026-01-15", "1.500.000", ""],
        );
        let req = create(&form).unwrap();
        assert_eq!(req.plate, "51A-123.45");
        assert_eq!(req.months, 3);
        assert_eq!(req.user_id, Some(RecordId::Num(7)));
        assert_eq!(req.starts_on, NaiveDate::from_ymd_opt(2026, 1, 15));
        assert_eq!(req.amount, Some(1_500_000.0));
        assert_eq!(req.note, None);
    }

    #[test]
    fn bad_months_are_rejected_before_sending() {
        let form = typed(form_for(&UiMode::Add, None).unwrap(), &["51A-123.45", "13"]);
        let err = create(&form).unwrap_err();
        assert_eq!(err.user_message(), messages::MONTHS_RANGE);

        let form = typed(form_for(&UiMode::Add, None).unwrap(), &["51A-123.45", "ba"]);
        assert_eq!(create(&form).unwrap_err().user_message(), messages::MONTHS_RANGE);
    }

    #[test]
    fn existing_user_needs_an_id_or_cccd() {
        let form = typed(
            form_for(&UiMode::ExistingUser, None).unwrap(),
            &["", "", "51A-123.45", "1"],
        );
        assert_eq!(
            existing_user(&form).unwrap_err().user_message(),
            messages::CUSTOMER_REQUIRED
        );
    }

    #[test]
    fn read_only_modes_have_no_form() {
        assert!(form_for(&UiMode::ViewDetail(RecordId::Num(1)), None).is_none());
        assert!(form_for(&UiMode::VehicleHistory("51A".into()), None).is_none());
        assert!(form_for(&UiMode::CheckActive, None).is_some());
    }
}
