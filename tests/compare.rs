use cigarcheck::cigar::{AccuracyRule, Matcher, SkipRule};
use cigarcheck::compare::{
    compare_all, write_rows, CompareParams, LongReadRecord, LongReadTable, ReadKey, SubreadRecord,
};
use cigarcheck::simulate::subread_name;

fn long_reads() -> LongReadTable {
    [
        ("m84/100/ccs", "100M"),
        ("m84/200/ccs", "5S300M2I200M1000N400M"),
        ("m84/300/ccs", ""),
    ]
    .iter()
    .filter_map(|(name, cigar)| LongReadRecord::new(name, cigar, b"ACGT".to_vec()))
    .collect()
}

fn subreads(entries: &[(&str, &str)]) -> Vec<SubreadRecord> {
    entries
        .iter()
        .filter_map(|(name, cigar)| SubreadRecord::new(name, cigar))
        .collect()
}

fn report(rows: &[cigarcheck::compare::ComparisonRow]) -> Vec<String> {
    let mut buf = Vec::new();
    write_rows(&mut buf, rows).unwrap();
    String::from_utf8(buf).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn end_to_end_report() {
    let subs = subreads(&[
        ("m84=100=ccs_random_subread_1_start_20_end_70", "50M"),
        ("m84=100=ccs_random_subread_2_start_20_end_70", "30M20I"),
        ("m84=100=ccs_random_subread_3", "50M"),
        ("m84=999=ccs_random_subread_1_start_0_end_149", "150M"),
        ("m84=300=ccs_random_subread_1_start_0_end_149", "150M"),
        ("m84=100=ccs_random_subread_4_start_0_end_149", ""),
    ]);
    assert_eq!(subs.len(), 5);

    let run = compare_all(&long_reads(), &subs, &CompareParams::default());
    assert_eq!(run.stats.total_subreads, 5);
    assert_eq!(run.stats.matched, 3);
    assert_eq!(run.stats.unmatched, 2);
    assert_eq!(run.stats.fully_matched, 2);
    assert!((run.stats.average_accuracy() - 0.6).abs() < 1e-12);
    assert!((run.stats.average_precision() - 2.6 / 5.0).abs() < 1e-12);

    let lines = report(&run.rows);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Subread ID\tSubread CIGAR\tExpected CIGAR\tStart\tStop"));
    assert_eq!(
        lines[1],
        "m84=100=ccs_random_subread_1_start_20_end_70\t50M\t150M\t20\t70\t100M\t50\t0\t0\t0\t0\t0\t1.0\t1.0"
    );
    assert_eq!(
        lines[2],
        "m84=100=ccs_random_subread_2_start_20_end_70\t30M20I\t150M\t20\t70\t100M\t30\t0\t0\t0\t0\t20\t1.0\t0.6"
    );
    assert_eq!(
        lines[3],
        "m84=100=ccs_random_subread_3\t50M\t150M\t0\t0\t100M\t50\t0\t0\t0\t0\t0\t1.0\t1.0"
    );
}

#[test]
fn spliced_long_read() {
    // 5S [0,5) 300M [5,305) 2I [305,307) 200M [307,507) 1000N [507,1507) 400M
    let subs = subreads(&[(
        "m84=200=ccs_random_subread_1_start_450_end_600",
        "57M93N",
    )]);
    let run = compare_all(&long_reads(), &subs, &CompareParams::default());
    let row = &run.rows[0];
    assert_eq!(row.expected_cigar, "150M93N");
    assert_eq!(row.shared_matches, 57);
    assert_eq!(row.shared_splices, 0);
    assert_eq!(row.unmatched_subread, 93);
}

#[test]
fn variants_change_scores() {
    let subs = subreads(&[("m84=100=ccs_random_subread_1_start_20_end_70", "30M20I")]);
    let params = CompareParams {
        min_match_total: 50,
        matcher: Matcher::new(SkipRule::Symmetric, AccuracyRule::ExpectedBases),
    };
    let run = compare_all(&long_reads(), &subs, &params);
    let row = &run.rows[0];
    assert_eq!(row.expected_cigar, "50M");
    assert_eq!(row.shared_matches, 30);
    assert!((row.accuracy - 0.6).abs() < 1e-12);
    assert!((row.precision - 0.6).abs() < 1e-12);
}

#[test]
fn empty_run() {
    let run = compare_all(&long_reads(), &[], &CompareParams::default());
    assert_eq!(run.stats.average_accuracy(), 0.0);
    assert_eq!(run.stats.average_precision(), 0.0);
    assert_eq!(report(&run.rows).len(), 1);
}

#[test]
fn sampled_name_with_equals_sign_finds_its_long_read() {
    let long_name = "sample=A/123/ccs";
    let long: LongReadTable = LongReadRecord::new(long_name, "100M", Vec::new())
        .into_iter()
        .collect();
    let name = subread_name(&ReadKey::from_long_read_name(long_name), 1, 20, 70);
    let subs = subreads(&[(name.as_str(), "50M")]);

    let run = compare_all(&long, &subs, &CompareParams::default());
    assert_eq!(run.rows.len(), 1);
    assert_eq!(run.stats.unmatched, 0);
    assert_eq!(run.rows[0].expected_cigar, "150M");
}
