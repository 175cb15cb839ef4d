//! Plain-text summaries of command outcomes.

use groupfund_core::{
    AccountInformation, ConfirmationResult, InnerTransactionType, RepairOutcome,
};

pub fn confirmation(action: &str, result: &ConfirmationResult) -> String {
    let mut lines = vec![format!(
        "{}: transaction {} confirmed in round {}",
        action, result.tx_id, result.confirmed_round
    )];

    for log in &result.logs {
        lines.push(format!("  log: {}", log));
    }
    for inner in &result.inner_transactions {
        let kind = match &inner.tx_type {
            InnerTransactionType::Payment => "payment",
            InnerTransactionType::AssetTransfer => "asset transfer",
            InnerTransactionType::Other(tag) => tag.as_str(),
        };
        lines.push(format!(
            "  inner {}: {} to {}",
            kind,
            inner.amount,
            inner.recipient.as_deref().unwrap_or("-")
        ));
    }
    for issue in &result.decoding_issues {
        lines.push(format!(
            "  undecoded {:?} #{}: {}",
            issue.location, issue.index, issue.message
        ));
    }

    lines.join("\n")
}

pub fn repair(outcome: &RepairOutcome) -> String {
    match outcome {
        RepairOutcome::AlreadyConsistent { address } => {
            format!("Wallet already consistent for {}", address)
        }
        RepairOutcome::Repaired {
            previous,
            address,
            backup,
        } => {
            let mut text = format!(
                "Wallet address rewritten from {} to {}",
                previous.as_deref().unwrap_or("<missing>"),
                address
            );
            if let Some(path) = backup {
                text.push_str(&format!(" (backup at {})", path.display()));
            }
            text
        }
    }
}

pub fn balance(info: &AccountInformation, micro_units_per_unit: u64) -> String {
    format!(
        "{}: {} ({} micro-units, minimum {}) at round {}",
        info.address,
        whole_units(info.amount, micro_units_per_unit),
        info.amount,
        info.min_balance,
        info.round
    )
}

fn whole_units(micro_units: u64, micro_units_per_unit: u64) -> String {
    let per_unit = micro_units_per_unit.max(1);
    let digits = per_unit.to_string().len() - 1;
    let whole = micro_units / per_unit;
    let fraction = micro_units % per_unit;
    if digits == 0 {
        whole.to_string()
    } else {
        format!("{}.{:0width$}", whole, fraction, width = digits)
    }
}
