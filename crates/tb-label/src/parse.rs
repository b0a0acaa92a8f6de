//! Run label grammar.

use crate::{LabelError, LabelResult, RunParameters};

const BATTERY_PREFIX: &str = "batt";

/// Optional id slots in label order.
const OPTIONAL_SLOTS: [(&str, &str); 3] = [
    ("disposable id", "disp"),
    ("unit id", "unit"),
    ("trial id", "trial"),
];

/// Parse a run label into its test parameters.
///
/// Directory components and a trailing file extension are ignored. Flow
/// rate, target temperature and battery id are mandatory and positional.
/// An optional id decorated with `disp`, `unit` or `trial` fills that slot;
/// an undecorated one fills the slot after the last filled one. Slots left
/// out are `None`.
pub fn parse_label(label: &str) -> LabelResult<RunParameters> {
    let stem = label_stem(label);
    let mut tokens = stem.split_whitespace();

    let flow_token = tokens.next().ok_or_else(|| missing(label, "flow rate"))?;
    let target_token = tokens
        .next()
        .ok_or_else(|| missing(label, "target temperature"))?;
    let battery_token = tokens.next().ok_or_else(|| missing(label, "battery id"))?;

    let flow_rate_ml_min = parse_flow(label, flow_token)?;
    let target_temp_c = parse_target(label, target_token)?;
    let battery_id = parse_id(label, "battery id", battery_token, BATTERY_PREFIX)?;

    let mut ids: [Option<String>; 3] = Default::default();
    let mut next_slot = 0;
    for token in tokens {
        let (slot, id) = decorated_slot(token).unwrap_or((next_slot, token));
        if ids.get(slot).is_none_or(Option::is_some) {
            return Err(LabelError::Unexpected {
                label: label.to_string(),
                token: token.to_string(),
            });
        }
        let (field, _) = OPTIONAL_SLOTS[slot];
        if !is_word(token) {
            return Err(bad_token(label, field, token));
        }
        ids[slot] = Some(id.to_string());
        next_slot = next_slot.max(slot + 1);
    }
    let [disposable_id, unit_id, trial_id] = ids;

    let params = RunParameters {
        flow_rate_ml_min,
        target_temp_c,
        battery_id,
        disposable_id,
        unit_id,
        trial_id,
    };
    tracing::debug!(label, ?params, "parsed run label");
    Ok(params)
}

/// File name without directories or a trailing alphabetic extension.
fn label_stem(label: &str) -> &str {
    let name = label.rsplit(['/', '\\']).next().unwrap_or(label);
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => name,
    }
}

fn parse_flow(label: &str, token: &str) -> LabelResult<u32> {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, units) = token.split_at(digits_end);
    if digits.is_empty() {
        return Err(not_numeric(label, "flow rate", token));
    }
    if !is_word(units) {
        return Err(bad_token(label, "flow rate", token));
    }
    let value: u32 = digits
        .parse()
        .map_err(|_| not_numeric(label, "flow rate", token))?;
    if value == 0 {
        return Err(not_numeric(label, "flow rate", token));
    }
    Ok(value)
}

fn parse_target(label: &str, token: &str) -> LabelResult<i32> {
    let number = token
        .strip_suffix(['C', 'c'])
        .unwrap_or(token);
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };
    let unsigned = int_part.strip_prefix('-').unwrap_or(int_part);
    let well_formed = !unsigned.is_empty()
        && unsigned.chars().all(|c| c.is_ascii_digit())
        && frac_part.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()));
    if !well_formed {
        return Err(not_numeric(label, "target temperature", token));
    }
    int_part
        .parse()
        .map_err(|_| not_numeric(label, "target temperature", token))
}

/// Slot named by a token's prefix, with the prefix removed.
fn decorated_slot(token: &str) -> Option<(usize, &str)> {
    OPTIONAL_SLOTS
        .iter()
        .enumerate()
        .find_map(|(slot, (_, prefix))| {
            let id = strip_decoration(token, prefix);
            (id.len() != token.len()).then_some((slot, id))
        })
}

fn parse_id(label: &str, field: &'static str, token: &str, prefix: &str) -> LabelResult<String> {
    if !is_word(token) {
        return Err(bad_token(label, field, token));
    }
    Ok(strip_decoration(token, prefix).to_string())
}

/// Drop a case-insensitive word prefix (and one `_`) when something remains.
fn strip_decoration<'a>(token: &'a str, prefix: &str) -> &'a str {
    let Some(head) = token.get(..prefix.len()) else {
        return token;
    };
    if !head.eq_ignore_ascii_case(prefix) {
        return token;
    }
    let rest = &token[prefix.len()..];
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    if rest.is_empty() { token } else { rest }
}

fn is_word(s: &str) -> bool {
    s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn missing(label: &str, field: &'static str) -> LabelError {
    LabelError::Missing {
        label: label.to_string(),
        field,
    }
}

fn not_numeric(label: &str, field: &'static str, token: &str) -> LabelError {
    LabelError::NotNumeric {
        label: label.to_string(),
        field,
        token: token.to_string(),
    }
}

fn bad_token(label: &str, field: &'static str, token: &str) -> LabelError {
    LabelError::BadToken {
        label: label.to_string(),
        field,
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_and_terse_forms_agree() {
        let verbose = parse_label("92ml_m 10C battA4 disp6.xlsx").unwrap();
        let terse = parse_label("92 10 A4 6.xlsx").unwrap();
        assert_eq!(verbose, terse);
        assert_eq!(verbose.flow_rate_ml_min, 92);
        assert_eq!(verbose.target_temp_c, 10);
        assert_eq!(verbose.battery_id, "A4");
        assert_eq!(verbose.disposable_id.as_deref(), Some("6"));
        assert_eq!(verbose.unit_id, None);
        assert_eq!(verbose.trial_id, None);
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        let p = parse_label("150ML_M 25c BATT_b7 DISP_12 Unit_3 TRIAL2.csv").unwrap();
        assert_eq!(p.flow_rate_ml_min, 150);
        assert_eq!(p.target_temp_c, 25);
        assert_eq!(p.battery_id, "b7");
        assert_eq!(p.disposable_id.as_deref(), Some("12"));
        assert_eq!(p.unit_id.as_deref(), Some("3"));
        assert_eq!(p.trial_id.as_deref(), Some("2"));
    }

    #[test]
    fn only_mandatory_fields() {
        let p = parse_label("60 4C battC1.xlsx").unwrap();
        assert_eq!(p, RunParameters::new(60, 4, "C1"));
    }

    #[test]
    fn directories_are_ignored() {
        let p = parse_label("/data/bench/run 1/92 10 A4 6.xlsx").unwrap();
        assert_eq!(p.battery_id, "A4");
        let p = parse_label(r"C:\bench\92 10 A4 6.xlsx").unwrap();
        assert_eq!(p.flow_rate_ml_min, 92);
    }

    #[test]
    fn fractional_target_is_truncated() {
        let p = parse_label("92 10.5C A4.xlsx").unwrap();
        assert_eq!(p.target_temp_c, 10);
        let p = parse_label("92 10.5 A4").unwrap();
        assert_eq!(p.target_temp_c, 10);
    }

    #[test]
    fn bare_prefix_is_an_id() {
        let p = parse_label("92 10 batt disp.xlsx").unwrap();
        assert_eq!(p.battery_id, "batt");
        assert_eq!(p.disposable_id.as_deref(), Some("disp"));
    }

    #[test]
    fn missing_mandatory_fields_fail() {
        assert!(matches!(
            parse_label("92ml_m 10C.xlsx"),
            Err(LabelError::Missing { field: "battery id", .. })
        ));
        assert!(matches!(
            parse_label(".xlsx"),
            Err(LabelError::Missing { field: "flow rate", .. })
        ));
    }

    #[test]
    fn non_numeric_flow_or_target_fail() {
        assert!(matches!(
            parse_label("fast 10C A4.xlsx"),
            Err(LabelError::NotNumeric { field: "flow rate", .. })
        ));
        assert!(matches!(
            parse_label("92 warmC A4.xlsx"),
            Err(LabelError::NotNumeric { field: "target temperature", .. })
        ));
        assert!(matches!(
            parse_label("0 10 A4.xlsx"),
            Err(LabelError::NotNumeric { field: "flow rate", .. })
        ));
    }

    #[test]
    fn decorated_ids_bind_to_their_slot() {
        let p = parse_label("92ml_m 10C battA4 disp6 trial1.csv").unwrap();
        assert_eq!(p.disposable_id.as_deref(), Some("6"));
        assert_eq!(p.unit_id, None);
        assert_eq!(p.trial_id.as_deref(), Some("1"));

        let p = parse_label("92ml_m 10C battA4 unit3.csv").unwrap();
        assert_eq!(p.disposable_id, None);
        assert_eq!(p.unit_id.as_deref(), Some("3"));
        assert_eq!(p.trial_id, None);
    }

    #[test]
    fn undecorated_id_follows_last_filled_slot() {
        let p = parse_label("92 10 A4 unit3 2.csv").unwrap();
        assert_eq!(p.disposable_id, None);
        assert_eq!(p.unit_id.as_deref(), Some("3"));
        assert_eq!(p.trial_id.as_deref(), Some("2"));
    }

    #[test]
    fn repeated_or_overflowing_slots_fail() {
        assert!(matches!(
            parse_label("92 10 A4 disp6 disp7.csv"),
            Err(LabelError::Unexpected { .. })
        ));
        assert!(matches!(
            parse_label("92 10 A4 trial2 7.csv"),
            Err(LabelError::Unexpected { .. })
        ));
    }

    #[test]
    fn extra_tokens_fail() {
        assert!(matches!(
            parse_label("92 10 A4 6 U1 T1 extra.xlsx"),
            Err(LabelError::Unexpected { .. })
        ));
    }

    #[test]
    fn punctuation_in_ids_fails() {
        assert!(matches!(
            parse_label("92 10 A-4.xlsx"),
            Err(LabelError::BadToken { field: "battery id", .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decorated_and_terse_labels_agree(
            flow in 1u32..2000,
            target in -20i32..90,
            battery in "[A-Z][0-9]{1,3}",
            disposable in "[0-9]{1,3}",
        ) {
            let verbose = format!("{flow}ml_m {target}C batt{battery} disp{disposable}.xlsx");
            let terse = format!("{flow} {target} {battery} {disposable}.xlsx");
            let a = parse_label(&verbose).unwrap();
            let b = parse_label(&terse).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.flow_rate_ml_min, flow);
            prop_assert_eq!(a.target_temp_c, target);
            prop_assert_eq!(a.battery_id, battery);
            // deterministic
            prop_assert_eq!(parse_label(&verbose).unwrap(), b);
        }
    }
}
