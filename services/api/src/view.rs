use asso_portal::config::AppConfig;
use asso_portal::error::AppError;
use asso_portal::members::{Member, MemberId, MemberImporter, MemberRole};
use asso_portal::session::{Session, TreasurySection};
use asso_portal::treasury::{
    member_transactions, BalanceAggregator, Caisse, LedgerCsv, MemberStatusEvaluator,
    RuleContext, Transaction, TransactionRuleTable, TransactionType, TreasuryPolicy,
};
use chrono::{Datelike, Local};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DefaultsArgs {
    /// Transaction type key, e.g. `tontine` or `cotisation_sociale`
    #[arg(long = "type")]
    pub(crate) transaction_type: String,
    /// Cotisation tranche (1, 2 or 3)
    #[arg(long)]
    pub(crate) tranche: Option<String>,
    /// Number of tontine shares
    #[arg(long)]
    pub(crate) shares: Option<u32>,
    /// Discipline reason (retard or blame)
    #[arg(long)]
    pub(crate) discipline: Option<String>,
    /// AG absence reason (1ère or 2ème)
    #[arg(long)]
    pub(crate) absence: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Treasury ledger CSV export
    #[arg(long)]
    pub(crate) ledger: PathBuf,
    /// Members directory CSV (id,first_name,last_name,role)
    #[arg(long)]
    pub(crate) members: Option<PathBuf>,
    /// Role of the signed-in user (admin, treasurer or member)
    #[arg(long, ignore_case = true, value_parser = parse_role)]
    pub(crate) role: MemberRole,
    /// Signed-in member id; required for the member role
    #[arg(long, required_if_eq_any([("role", "member"), ("role", "membre")]))]
    pub(crate) member: Option<String>,
    /// Year used for member compliance (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Treasury ledger CSV to validate and normalise
    #[arg(long)]
    pub(crate) ledger: PathBuf,
}

fn parse_role(raw: &str) -> Result<MemberRole, String> {
    MemberRole::parse(raw).ok_or_else(|| format!("unknown role '{raw}'"))
}

pub(crate) fn run_defaults(args: DefaultsArgs) -> Result<(), AppError> {
    let context = RuleContext {
        tranche: args.tranche,
        shares: args.shares,
        discipline_reason: args.discipline,
        ag_absence_reason: args.absence,
    };

    let Some(transaction_type) = TransactionType::parse(&args.transaction_type) else {
        println!("Unknown transaction type '{}'", args.transaction_type);
        println!("Known types:");
        for transaction_type in TransactionType::ordered() {
            println!("  - {} ({})", transaction_type.key(), transaction_type.label());
        }
        return Ok(());
    };

    let defaults = TransactionRuleTable::resolve_defaults(transaction_type, &context);
    println!("{}", transaction_type.label());
    match defaults.amount {
        Some(amount) => println!("- Amount: {}", format_amount(amount)),
        None => println!("- Amount: entered by the treasurer"),
    }
    match defaults.caisse {
        Some(caisse) => println!("- Caisse: {}", caisse.label()),
        None => println!("- Caisse: chosen by the treasurer"),
    }
    if !defaults.required_fields.is_empty() {
        let fields: Vec<&str> = defaults
            .required_fields
            .iter()
            .map(|field| field.key())
            .collect();
        println!("- Required: {}", fields.join(", "));
    }

    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let transactions = LedgerCsv::from_path(&args.ledger)?;
    let members = match &args.members {
        Some(path) => MemberImporter::from_path(path)?,
        None => Vec::new(),
    };

    let session = Session::new(MemberId(args.member.unwrap_or_default()), args.role);

    let view = TreasuryView {
        session: &session,
        members: &members,
        transactions: &transactions,
        policy: config.treasury.policy,
        year: args.year.unwrap_or_else(|| Local::now().year()),
    };
    print!("{}", view.render());
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let mut transactions = LedgerCsv::from_path(&args.ledger)?;
    transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    LedgerCsv::write(std::io::stdout().lock(), &transactions)?;
    Ok(())
}

/// Terminal rendering of the treasury page for one session.
pub(crate) struct TreasuryView<'a> {
    pub(crate) session: &'a Session,
    pub(crate) members: &'a [Member],
    pub(crate) transactions: &'a [Transaction],
    pub(crate) policy: TreasuryPolicy,
    pub(crate) year: i32,
}

impl TreasuryView<'_> {
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Treasury {} | signed in as {}",
            self.year,
            self.session.role().label()
        );

        for section in self.session.treasury_sections() {
            match section {
                TreasurySection::Balances => self.render_balances(&mut out),
                TreasurySection::Correlations => self.render_correlations(&mut out),
                TreasurySection::Ledger => self.render_ledger(&mut out),
                TreasurySection::MemberStatuses => {
                    let _ = writeln!(out, "\nMember statuses");
                    for member_id in self.member_ids() {
                        self.render_status(&mut out, &member_id);
                    }
                }
                TreasurySection::OwnStatus => {
                    let _ = writeln!(out, "\nMy status");
                    self.render_status(&mut out, self.session.member_id());
                }
            }
        }

        out
    }

    fn aggregator(&self) -> BalanceAggregator {
        BalanceAggregator::new(self.policy.withdrawal_sign)
    }

    fn render_balances(&self, out: &mut String) {
        let balances = self.aggregator().balances(self.transactions);
        let _ = writeln!(out, "\nBalances");
        for caisse in Caisse::ordered() {
            let _ = writeln!(
                out,
                "- {}: {}",
                caisse.label(),
                format_amount(balances.get(caisse))
            );
        }
        let _ = writeln!(out, "- Total: {}", format_amount(balances.total()));
    }

    fn render_correlations(&self, out: &mut String) {
        let summary = self.aggregator().compute_summary(self.transactions);
        let _ = writeln!(out, "\nCorrelations");
        if summary.correlations.is_empty() {
            let _ = writeln!(out, "- none (empty balances)");
        }
        for (key, ratio) in &summary.correlations {
            let _ = writeln!(out, "- {key}: {ratio:.2}");
        }
    }

    fn render_ledger(&self, out: &mut String) {
        let mut ordered: Vec<&Transaction> = self.transactions.iter().collect();
        ordered.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let _ = writeln!(out, "\nLedger ({} transactions)", ordered.len());
        for transaction in ordered {
            let _ = writeln!(
                out,
                "- {} {} {} | {} | {} -> {}",
                transaction.date,
                transaction.id,
                self.member_name(&transaction.member_id),
                transaction.transaction_type().label(),
                format_amount(transaction.amount),
                transaction.caisse.label()
            );
        }
    }

    fn render_status(&self, out: &mut String, member_id: &MemberId) {
        let evaluator = MemberStatusEvaluator::new(self.policy.social_contribution_target);
        let report =
            evaluator.evaluate(member_transactions(self.transactions, member_id), self.year);
        let status = &report.status;

        let _ = writeln!(
            out,
            "- {}: cotisation {} | tontine {} part(s) | {} absence(s) AG",
            self.member_name(member_id),
            format_amount(status.social_contribution_paid_this_year),
            status.tontine_shares_total,
            status.ag_absence_count
        );
        if report.is_compliant() {
            let _ = writeln!(out, "    à jour");
        }
        for alert in &report.alerts {
            let _ = writeln!(out, "    ! {alert}");
        }
    }

    /// Directory members first, then ledger members the directory does not list.
    fn member_ids(&self) -> Vec<MemberId> {
        let mut ids: Vec<MemberId> = self
            .members
            .iter()
            .map(|member| member.id.clone())
            .collect();
        for transaction in self.transactions {
            if !ids.contains(&transaction.member_id) {
                ids.push(transaction.member_id.clone());
            }
        }
        ids
    }

    fn member_name(&self, member_id: &MemberId) -> String {
        self.members
            .iter()
            .find(|member| &member.id == member_id)
            .map(Member::display_name)
            .unwrap_or_else(|| member_id.to_string())
    }
}

fn format_amount(amount: impl Into<i128>) -> String {
    let amount: i128 = amount.into();
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} FCFA")
}

#[cfg(test)]
mod tests {
    use super::*;
    use asso_portal::treasury::{TontineShares, Tranche, TransactionId, TransactionKind};
    use chrono::NaiveDate;

    fn transaction(
        id: &str,
        member: &str,
        kind: TransactionKind,
        amount: u64,
        caisse: Caisse,
    ) -> Transaction {
        Transaction {
            id: TransactionId(id.to_string()),
            member_id: MemberId(member.to_string()),
            kind,
            amount,
            caisse,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date"),
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            transaction(
                "t-1",
                "m-01",
                TransactionKind::CotisationSociale {
                    tranche: Tranche::First,
                },
                20_000,
                Caisse::SocialContributionAccount,
            ),
            transaction(
                "t-2",
                "m-02",
                TransactionKind::Tontine {
                    shares: TontineShares::new(1).expect("in range"),
                },
                10_000,
                Caisse::TontineAccount,
            ),
        ]
    }

    fn members() -> Vec<Member> {
        vec![Member {
            id: MemberId("m-01".to_string()),
            first_name: "Awa".to_string(),
            last_name: "Ndiaye".to_string(),
            role: MemberRole::Treasurer,
        }]
    }

    #[test]
    fn amounts_are_grouped_by_thousands() {
        assert_eq!(format_amount(0), "0 FCFA");
        assert_eq!(format_amount(2_500), "2 500 FCFA");
        assert_eq!(format_amount(1_250_000), "1 250 000 FCFA");
        assert_eq!(format_amount(-15_000), "-15 000 FCFA");
        assert_eq!(format_amount(u64::MAX), "18 446 744 073 709 551 615 FCFA");
    }

    #[test]
    fn treasurer_view_shows_every_section() {
        let session = Session::new(MemberId("m-01".to_string()), MemberRole::Treasurer);
        let (members, transactions) = (members(), ledger());
        let view = TreasuryView {
            session: &session,
            members: &members,
            transactions: &transactions,
            policy: TreasuryPolicy::default(),
            year: 2026,
        };

        let rendered = view.render();

        assert!(rendered.contains("Balances"));
        assert!(rendered.contains("- Caisse tontine: 10 000 FCFA"));
        assert!(rendered.contains("Correlations"));
        assert!(rendered.contains("Ledger (2 transactions)"));
        assert!(rendered.contains("- Awa Ndiaye: cotisation 20 000 FCFA"));
        assert!(rendered.contains("- m-02: cotisation 0 FCFA | tontine 1 part(s)"));
        assert!(!rendered.contains("My status"));
    }

    #[test]
    fn member_view_shows_only_own_status() {
        let session = Session::new(MemberId("m-02".to_string()), MemberRole::Member);
        let (members, transactions) = (members(), ledger());
        let view = TreasuryView {
            session: &session,
            members: &members,
            transactions: &transactions,
            policy: TreasuryPolicy::default(),
            year: 2026,
        };

        let rendered = view.render();

        assert!(rendered.contains("My status"));
        assert!(rendered.contains("- m-02: cotisation 0 FCFA | tontine 1 part(s)"));
        assert!(rendered.contains("! droit d'adhésion non payé"));
        assert!(!rendered.contains("Balances"));
        assert!(!rendered.contains("Awa Ndiaye"));
        assert!(!rendered.contains("Ledger"));
    }
}
