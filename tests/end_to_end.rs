use chrono::{Duration, NaiveDate};
use statement_matcher::{
    find_matches, Frequency, MatchType, SingleFileMatcher, Transaction,
};

fn create_test_transaction(id: &str, date: &str, amount: f64, description: &str) -> Transaction {
    Transaction::new(
        id,
        amount,
        description,
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
    )
}

fn count(matches: &[statement_matcher::Match], match_type: MatchType) -> usize {
    matches.iter().filter(|m| m.match_type == match_type).count()
}

fn mixed_statement() -> Vec<Transaction> {
    vec![
        create_test_transaction("1", "2024-01-01", -50.0, "Netflix Subscription"),
        create_test_transaction("2", "2024-01-03", -4.75, "STARBUCKS #118"),
        create_test_transaction("3", "2024-01-03", -4.75, "STARBUCKS #118"),
        create_test_transaction("4", "2024-01-10", 100.0, "Transfer to Savings"),
        create_test_transaction("5", "2024-01-10", -100.0, "Transfer to Savings Acct"),
        create_test_transaction("6", "2024-02-01", -50.0, "Netflix Subscription"),
        create_test_transaction("7", "2024-02-09", -6.20, "STARBUCKS #204"),
        create_test_transaction("8", "2024-03-01", -50.0, "Netflix Subscription"),
        create_test_transaction("9", "2024-03-04", -212.40, "PAYMENT City Electric Co"),
    ]
}

#[test]
fn netflix_end_to_end() {
    let transactions = vec![
        create_test_transaction("n1", "2024-01-01", 50.0, "Netflix Subscription"),
        create_test_transaction("n2", "2024-02-01", 50.0, "Netflix Subscription"),
        create_test_transaction("n3", "2024-03-01", 50.0, "Netflix Subscription"),
    ];

    let matches = find_matches(&transactions);

    assert_eq!(count(&matches, MatchType::Pattern), 1);
    assert_eq!(count(&matches, MatchType::Duplicate), 0);
    assert_eq!(count(&matches, MatchType::CategorySuggestion), 0);
    assert_eq!(count(&matches, MatchType::Reconciliation), 0);

    let pattern = &matches[0];
    assert_eq!(pattern.frequency, Some(Frequency::Monthly));
    assert_eq!(pattern.confidence, 0.85);
    assert_eq!(pattern.transactions.len(), 3);
}

#[test]
fn find_matches_is_idempotent() {
    let transactions = mixed_statement();
    let matcher = SingleFileMatcher::new();

    let first = matcher.find_matches(&transactions);
    let second = matcher.find_matches(&transactions);

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn input_is_left_untouched() {
    let transactions = mixed_statement();
    let snapshot = transactions.clone();

    let _ = find_matches(&transactions);

    assert_eq!(transactions, snapshot);
}

#[test]
fn equal_key_transactions_share_one_duplicate_match() {
    let matches = find_matches(&mixed_statement());

    let duplicates: Vec<_> = matches
        .iter()
        .filter(|m| m.match_type == MatchType::Duplicate)
        .collect();

    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].transaction_ids(), vec!["2", "3"]);
    assert_eq!(duplicates[0].confidence, 0.95);
}

#[test]
fn thirty_day_spacing_is_monthly() {
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let transactions: Vec<Transaction> = (0..3)
        .map(|i| {
            Transaction::new(
                &format!("g{}", i),
                -39.0,
                "Anytime Fitness Club",
                start + Duration::days(30 * i),
            )
        })
        .collect();

    let matches = find_matches(&transactions);
    let patterns: Vec<_> = matches
        .iter()
        .filter(|m| m.match_type == MatchType::Pattern)
        .collect();

    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].frequency, Some(Frequency::Monthly));
    assert_eq!(patterns[0].confidence, 0.85);
}

#[test]
fn starbucks_suggests_meals() {
    let matches = find_matches(&mixed_statement());

    let suggestions: Vec<_> = matches
        .iter()
        .filter(|m| m.match_type == MatchType::CategorySuggestion)
        .collect();

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].category.as_deref(), Some("Meals & Entertainment"));
    assert_eq!(suggestions[0].confidence, 0.95);
    assert_eq!(suggestions[0].transaction_ids(), vec!["2", "3", "7"]);
}

#[test]
fn transfer_pair_reconciles() {
    let matches = find_matches(&mixed_statement());

    let pairs: Vec<_> = matches
        .iter()
        .filter(|m| m.match_type == MatchType::Reconciliation)
        .collect();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].transaction_ids(), vec!["4", "5"]);
    assert_eq!(pairs[0].confidence, 0.9);
}

#[test]
fn a_transaction_may_appear_in_several_match_types() {
    let matches = find_matches(&mixed_statement());

    let containing_2: Vec<MatchType> = matches
        .iter()
        .filter(|m| m.contains("2"))
        .map(|m| m.match_type)
        .collect();

    assert_eq!(containing_2, vec![MatchType::Duplicate, MatchType::CategorySuggestion]);
}

#[test]
fn lone_transaction_produces_nothing() {
    let transactions = vec![create_test_transaction("solo", "2024-06-01", -73.10, "Hardware Store")];

    assert!(find_matches(&transactions).is_empty());
    assert!(find_matches(&[]).is_empty());
}

#[test]
fn output_size_stays_bounded() {
    // Worst case for reconciliation: every deposit pairs with every payment
    let mut transactions = Vec::new();
    for i in 0..10 {
        transactions.push(create_test_transaction(&format!("d{}", i), "2024-01-01", 20.0, "Internal Transfer"));
        transactions.push(create_test_transaction(&format!("p{}", i), "2024-01-02", -20.0, "Internal Transfer"));
    }

    let matches = find_matches(&transactions);
    let n = transactions.len();
    let members: usize = matches.iter().map(|m| m.transactions.len()).sum();

    assert!(members <= n * n);
    assert_eq!(
        matches.iter().filter(|m| m.match_type == MatchType::Reconciliation).count(),
        10
    );
}
