use aba_file::{
    AbaEncoder, AbaError, DetailTransaction, FileHeader, Transaction, TransactionCode,
    ValidationError, generate_aba_file,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn header() -> FileHeader {
    FileHeader::new(
        "123-456",
        "123456789",
        "ABC",
        "TEST USER",
        "TEST REMITTER",
        "123456",
        "PAYROLL",
    )
    .with_processing_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
}

fn salary() -> DetailTransaction {
    DetailTransaction::new(
        "654-321",
        "987654321",
        "JOHN SMITH",
        1000,
        TransactionCode::PayrollPayment,
        "SALARY",
    )
}

fn lines(file: &str) -> Vec<&str> {
    file.split("\r\n").collect()
}

fn trailer_totals(trailer: &str) -> (&str, &str, &str, &str) {
    (
        &trailer[20..30],
        &trailer[30..40],
        &trailer[40..50],
        &trailer[74..80],
    )
}

#[test]
fn generates_expected_records_for_a_single_payroll_credit() {
    let file = generate_aba_file(&header(), [salary()]).unwrap();
    let lines = lines(&file);
    assert_eq!(lines.len(), 3);

    let descriptive = format!(
        "0123-456123456789 01ABC{}{:<26}123456{:<12}050324{}",
        " ".repeat(7),
        "TEST USER",
        "PAYROLL",
        " ".repeat(40)
    );
    assert_eq!(lines[0], descriptive);
    assert!(lines[0].starts_with("0123-456123456789 01ABC"));

    let detail = format!(
        "1654-321987654321 530000001000{:<32}{:<18}123-456123456789{:<16}00000000",
        "JOHN SMITH", "SALARY", "TEST REMITTER"
    );
    assert_eq!(lines[1], detail);
    assert!(lines[1].starts_with("1654-321987654321 53"));

    let trailer = format!(
        "7999-999{}000000100000000010000000000000{}000001{}",
        " ".repeat(12),
        " ".repeat(24),
        " ".repeat(40)
    );
    assert_eq!(lines[2], trailer);
}

#[test]
fn every_line_is_120_columns_and_only_the_trailer_lacks_crlf() {
    let txs = vec![
        salary(),
        salary().with_indicator("W").with_tax_withholding(1500),
        DetailTransaction::new(
            "111-222",
            "",
            "A",
            1,
            TransactionCode::ExternallyInitiatedDebit,
            "",
        ),
    ];
    let file = generate_aba_file(&header(), &txs).unwrap();
    assert!(!file.ends_with("\r\n"));
    assert_eq!(file.matches("\r\n").count(), 4);
    for line in lines(&file) {
        assert_eq!(line.len(), 120, "{line:?}");
        assert!(line.is_ascii());
    }
}

#[test]
fn empty_batch_has_header_and_zero_trailer() {
    let file = generate_aba_file(&header(), Vec::<DetailTransaction>::new()).unwrap();
    let lines = lines(&file);
    assert_eq!(lines.len(), 2);
    assert_eq!(
        trailer_totals(lines[1]),
        ("0000000000", "0000000000", "0000000000", "000000")
    );
}

#[test]
fn totals_split_debits_from_credits() {
    let txs = vec![
        DetailTransaction::new("111-111", "1", "A", 5000, TransactionCode::ExternallyInitiatedDebit, "D1"),
        DetailTransaction::new("111-111", "2", "B", 1200, TransactionCode::Dividend, "C1"),
        DetailTransaction::new("111-111", "3", "C", 800, TransactionCode::PensionPayment, "C2"),
        DetailTransaction::new("111-111", "4", "D", 250, TransactionCode::ExternallyInitiatedDebit, "D2"),
    ];
    let (file, totals) = AbaEncoder::new(&header())
        .generate_with_totals(&txs)
        .unwrap();

    let debit: u64 = txs
        .iter()
        .filter(|tx| tx.code().is_some_and(TransactionCode::is_debit))
        .map(|tx| tx.amount().parse::<u64>().unwrap())
        .sum();
    assert_eq!(totals.debit_total, debit);
    assert_eq!(totals.credit_total, 2000);
    assert_eq!(totals.records, 4);

    let trailer = *lines(&file).last().unwrap();
    assert_eq!(
        trailer_totals(trailer),
        ("0000003250", "0000002000", "0000005250", "000004")
    );
}

#[test]
fn bare_transaction_counts_as_one_record() {
    let h = header();
    let file = AbaEncoder::new(&h).generate_one(&salary()).unwrap();
    let trailer = *lines(&file).last().unwrap();
    assert_eq!(&trailer[74..80], "000001");
}

#[test]
fn invalid_bsb_aborts_the_whole_file() {
    let mut bad = salary();
    bad.bsb = "654321".into();
    let err = generate_aba_file(&header(), [salary(), bad, salary()]).unwrap_err();
    match err {
        AbaError::Validation(ValidationError::Detail { index, error }) => {
            assert_eq!(index, Some(1));
            assert_eq!(error.field, "bsb");
            assert_eq!(error.value, "654321");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn indicator_z_is_rejected_but_markers_and_blanks_pass() {
    let err = generate_aba_file(&header(), [salary().with_indicator("Z")]).unwrap_err();
    assert!(matches!(
        err,
        AbaError::Validation(ValidationError::Detail { .. })
    ));
    for ok in ["W", "X", "Y", " ", ""] {
        let file = generate_aba_file(&header(), [salary().with_indicator(ok)]).unwrap();
        let detail = lines(&file)[1];
        let expected = if ok.is_empty() { " " } else { ok };
        assert_eq!(&detail[17..18], expected);
    }
}

#[test]
fn invalid_header_fails_before_any_transaction() {
    let mut h = header();
    h.direct_entry_user_id = "12".into();
    let err = generate_aba_file(&h, [salary()]).unwrap_err();
    assert!(matches!(
        err,
        AbaError::Validation(ValidationError::Header(ref e)) if e.field == "direct entry user ID"
    ));
}

#[test]
fn trace_fields_use_the_header_and_remitter_can_be_overridden() {
    let h = header();
    let encoder = AbaEncoder::new(&h);
    let fallback = encoder.detail_record(&salary()).unwrap();
    assert_eq!(&fallback[80..87], "123-456");
    assert_eq!(&fallback[87..96], "123456789");
    assert_eq!(&fallback[96..112], format!("{:<16}", "TEST REMITTER"));

    let own = encoder
        .detail_record(&salary().with_remitter("ACME PAYROLL"))
        .unwrap();
    assert_eq!(&own[96..112], format!("{:<16}", "ACME PAYROLL"));
}

#[test]
fn short_account_numbers_are_space_padded() {
    let mut h = header();
    h.account_number = "4321".into();
    let mut tx = salary();
    tx.account_number = "12".into();
    let file = generate_aba_file(&h, [tx]).unwrap();
    let lines = lines(&file);
    assert_eq!(&lines[0][8..17], "     4321");
    assert_eq!(&lines[1][8..17], "       12");
    assert_eq!(&lines[1][87..96], "     4321");
}

#[test]
fn header_without_account_blanks_columns_2_to_18() {
    let h = header().with_account_number_in_header(false);
    let file = generate_aba_file(&h, [salary()]).unwrap();
    let lines = lines(&file);
    assert_eq!(&lines[0][1..18], " ".repeat(17));
    assert_eq!(&lines[0][18..20], "01");
    // trace fields still carry the account
    assert_eq!(&lines[1][80..96], "123-456123456789");
}

#[test]
fn remitter_fallback_wider_than_column_is_an_error() {
    let mut h = header();
    h.remitter = "A VERY LONG REMITTER NAME".into();
    let err = generate_aba_file(&h, [salary()]).unwrap_err();
    assert!(matches!(
        err,
        AbaError::FieldOverflow {
            field: "remitter",
            width: 16,
            ..
        }
    ));
}

#[test]
fn credit_total_wider_than_ten_digits_is_an_error() {
    let big = DetailTransaction::new(
        "111-111",
        "1",
        "A",
        9_999_999_999,
        TransactionCode::ExternallyInitiatedCredit,
        "",
    );
    let err = generate_aba_file(&header(), [big.clone(), big]).unwrap_err();
    assert!(matches!(err, AbaError::FieldOverflow { width: 10, .. }));
}

#[test]
fn encoder_accepts_trait_objects() {
    let txs: Vec<Box<dyn Transaction>> = vec![Box::new(salary()), Box::new(salary())];
    let file = generate_aba_file(&header(), &txs).unwrap();
    assert_eq!(lines(&file).len(), 4);
}

#[test]
fn header_remitter_outside_printable_ascii_is_an_error() {
    for remitter in ["CAFÉ PTY", "ACME\r\nX"] {
        let mut h = header();
        h.remitter = remitter.into();
        let err = generate_aba_file(&h, [salary()]).unwrap_err();
        assert_eq!(
            err,
            AbaError::Unprintable {
                record: "detail",
                field: "remitter",
                value: remitter.into(),
            }
        );
        // an override means the header remitter is never written
        let file = generate_aba_file(&h, [salary().with_remitter("ACME")]).unwrap();
        assert_eq!(lines(&file).len(), 3);
        assert!(file.is_ascii());
    }
}
