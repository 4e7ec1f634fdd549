//! Round-trip tests: reading GFF3 and writing it back must reproduce every
//! data line exactly.

use gffkit::config;
use gffkit::feature::{Bound, Phase};
use gffkit::gff::{parse_str, read_all, read_all_checked, read_collection, GffError, GffReader};
use gffkit::streaming::{to_gff3_string, GffWriter};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

const SINGLE_RECORD: &str = "##gff-version 3\n\
##sequence-region Chromosome 1 4641652\n\
Chromosome\tEuropean Nucleotide Archive\tchromosome\t1\t4641652\t.\t.\t.\tID=chromosome:Chromosome;Alias=U00096.3;Is_circular=true\n\
Chromosome\tregulondb_feature\tbiological_region\t148\t148\t.\t+\t.\texternal_name=Promoter thrLp (RegulonDB:ECK120010236);logic_name=regulondb_promoter\n";

const MULTI_RECORD: &str = "##gff-version 3\n\
Chromosome\tEuropean Nucleotide Archive\tchromosome\t1\t4641652\t.\t.\t.\tID=chromosome:Chromosome;Alias=U00096.3;Is_circular=true\n\
Chromosome\tregulondb_feature\tbiological_region\t148\t148\t.\t+\t.\texternal_name=Promoter thrLp (RegulonDB:ECK120010236);logic_name=regulondb_promoter\n\
gi|556503834|ref|NC_000913.3|\tProdigal_v2.60\tCDS\t3\t98\t1.8\t+\t0\tID=1_1;partial=10;start_type=Edge;rbs_motif=None;rbs_spacer=None;gc_cont=0.427;conf=60.39;score=1.84;cscore=-0.88;sscore=2.72;rscore=0.00;uscore=0.00;tscore=3.22;\n\
gi|556503834|ref|NC_000913.3|\tProdigal_v2.60\tCDS\t337\t2799\t333.8\t+\t0\tID=1_2;partial=00;start_type=ATG;rbs_motif=GGAG/GAGG;rbs_spacer=5-10bp;gc_cont=0.531;conf=99.99;score=333.83;cscore=323.42;sscore=10.41;rscore=9.55;uscore=1.51;tscore=0.00;\n";

fn create_gff_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn data_lines(content: &str) -> Vec<&str> {
    content.lines().filter(|l| !l.starts_with('#')).collect()
}

#[test]
fn test_eden_scenario() {
    let line = "ctg123\t.\tgene\t1000\t9000\t.\t+\t.\tID=gene00001;Name=EDEN";
    let content = format!("##gff-version 3\n{}\n", line);

    let (seq_id, coll) = GffReader::new(content.as_bytes()).read_record(1).unwrap();
    assert_eq!(seq_id, "ctg123");
    let feature = coll.get(0).unwrap();
    assert_eq!(feature.bounds, vec![Bound::new(999, 9000)]);
    assert_eq!(feature.metadata.source.as_deref(), Some("."));
    assert_eq!(feature.metadata.feature_type.as_deref(), Some("gene"));
    assert_eq!(feature.metadata.score.as_deref(), Some("."));
    assert_eq!(feature.metadata.strand.as_deref(), Some("+"));
    assert_eq!(feature.metadata.phase, Phase::Absent);

    let out = to_gff3_string(&coll, &seq_id).unwrap();
    assert_eq!(data_lines(&out), vec![line]);
}

#[test]
fn test_single_record_round_trip() {
    let file = create_gff_file(SINGLE_RECORD);
    let (seq_id, coll) = read_collection(file.path(), 1).unwrap();

    assert_eq!(seq_id, "Chromosome");
    assert_eq!(coll.len(), 2);
    assert_eq!(coll.get(0).unwrap().bounds, vec![Bound::new(0, 4641652)]);
    assert_eq!(coll.get(1).unwrap().bounds, vec![Bound::new(147, 148)]);

    let out = to_gff3_string(&coll, "Chromosome").unwrap();
    assert!(out.starts_with("##gff-version 3\n"));
    assert_eq!(data_lines(&out), data_lines(SINGLE_RECORD));
}

#[test]
fn test_multi_record_round_trip() {
    let file = create_gff_file(MULTI_RECORD);
    let seqs = read_all(file.path()).unwrap();
    assert_eq!(seqs.len(), 2);
    assert_eq!(seqs[1].0, "gi|556503834|ref|NC_000913.3|");

    let cds = seqs[1].1.get(0).unwrap();
    assert_eq!(cds.bounds, vec![Bound::new(2, 98)]);
    assert_eq!(cds.metadata.phase, Phase::Value(0));
    assert_eq!(cds.metadata.score_value(), Some(1.8));

    let mut writer = GffWriter::new(Vec::new());
    writer.write_header().unwrap();
    for (seq_id, coll) in &seqs {
        writer.write_features(coll, seq_id).unwrap();
    }
    let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(data_lines(&out), data_lines(MULTI_RECORD));
}

#[test]
fn test_second_record_by_number() {
    let file = create_gff_file(MULTI_RECORD);
    let (seq_id, coll) = read_collection(file.path(), 2).unwrap();
    assert_eq!(seq_id, "gi|556503834|ref|NC_000913.3|");
    assert_eq!(coll.len(), 2);

    let err = read_collection(file.path(), 3).unwrap_err();
    assert!(matches!(err, GffError::InsufficientRecords { requested: 3, .. }));
}

#[test]
fn test_wrong_columns_aborts_read() {
    let content = "##gff-version 3\n\
                   Chromosome\t.\tgene\t1\t10\t.\t+\t.\tID=a\n\
                   Chromosome\t.\tgene\t1\t10\t.\t+\t.\n";
    let err = parse_str(content).unwrap_err();
    // The offending line is quoted with escaped tabs
    assert!(err.to_string().contains("Chromosome\\t.\\tgene"));
    match err {
        GffError::MalformedRecord { columns, line } => {
            assert_eq!(columns, 8);
            assert!(line.starts_with("Chromosome"));
        }
        other => panic!("expected MalformedRecord, got {other}"),
    }
}

#[test]
fn test_empty_file_reads_empty_collection() {
    let file = create_gff_file("");
    let (seq_id, coll) = read_collection(file.path(), 1).unwrap();
    assert_eq!(seq_id, "");
    assert!(coll.is_empty());
    assert!(read_all(file.path()).unwrap().is_empty());
}

#[test]
fn test_attributes_on_demand() {
    let seqs = parse_str(MULTI_RECORD).unwrap();
    let chrom = seqs[0].1.get(0).unwrap();
    let attrs = chrom.metadata.parsed_attributes().unwrap();
    assert_eq!(attrs["ID"], "chromosome:Chromosome");
    assert_eq!(attrs["Alias"], "U00096.3");
    assert_eq!(attrs["Is_circular"], "true");

    // A malformed attribute column does not break reading
    let content = "##gff-version 3\ns\t.\tgene\t1\t10\t.\t+\t.\tID=gene1;BadSegmentNoEquals\n";
    let seqs = parse_str(content).unwrap();
    let feature = seqs[0].1.get(0).unwrap();
    assert!(matches!(
        feature.metadata.parsed_attributes(),
        Err(GffError::MalformedAttribute { .. })
    ));
}

#[test]
#[serial]
fn test_trailing_semicolon_needs_lenient_attributes() {
    let seqs = parse_str(MULTI_RECORD).unwrap();
    let cds = seqs[1].1.get(0).unwrap();

    config::set_lenient_attributes(false);
    assert!(matches!(
        cds.metadata.parsed_attributes(),
        Err(GffError::MalformedAttribute { ref segment }) if segment.is_empty()
    ));

    config::set_lenient_attributes(true);
    let attrs = cds.metadata.parsed_attributes().unwrap();
    assert_eq!(attrs["ID"], "1_1");
    assert_eq!(attrs["tscore"], "3.22");
    assert_eq!(attrs.len(), 13);
    config::set_lenient_attributes(false);

    // Reading and writing never look inside the attribute column
    assert_eq!(
        to_gff3_string(&seqs[1].1, &seqs[1].0).unwrap(),
        format!("##gff-version 3\n{}\n", data_lines(MULTI_RECORD)[2..].join("\n"))
    );
}

#[test]
fn test_read_all_checked_requires_directive() {
    let good = create_gff_file(MULTI_RECORD);
    assert_eq!(read_all_checked(good.path()).unwrap().len(), 2);

    let missing = create_gff_file("Chromosome\t.\tgene\t1\t10\t.\t+\t.\tID=a\n");
    assert!(matches!(
        read_all_checked(missing.path()),
        Err(GffError::FormatMismatch(_))
    ));
    // Reading without the check still works
    assert_eq!(read_all(missing.path()).unwrap().len(), 1);
}
