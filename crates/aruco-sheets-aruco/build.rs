use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::{env, fs};

/// One `data/*.json` family table: a prefix of an OpenCV `DICT_NxN_1000`
/// code list, bits row-major with white = 1.
#[derive(Deserialize)]
struct FamilyTable {
    name: String,
    marker_size: usize,
    codes: Vec<u64>,
}

fn load(path: &Path) -> FamilyTable {
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    let table: FamilyTable = serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));

    let n = table.marker_size;
    assert!(
        (4..=7).contains(&n),
        "{}: marker_size {n} outside 4..=7",
        table.name
    );
    assert!(
        table.codes.len() <= 1000,
        "{}: more than 1000 codes",
        table.name
    );
    let limit = 1u64 << (n * n);
    if let Some(bad) = table.codes.iter().find(|&&c| c >= limit) {
        panic!("{}: code {bad:#x} does not fit {n}x{n} bits", table.name);
    }
    let mut sorted = table.codes.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(
        sorted.len(),
        table.codes.len(),
        "{}: duplicate codes",
        table.name
    );
    table
}

fn main() {
    println!("cargo:rerun-if-changed=data");

    let mut paths: Vec<PathBuf> = fs::read_dir("data")
        .expect("data/ directory with family tables")
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut tables: Vec<FamilyTable> = paths.iter().map(|p| load(p)).collect();
    tables.sort_by_key(|t| t.marker_size);
    if let Some(pair) = tables.windows(2).find(|w| w[0].marker_size == w[1].marker_size) {
        panic!("two tables for {0}x{0} markers", pair[0].marker_size);
    }

    let mut out = String::new();
    for t in &tables {
        let n = t.marker_size;
        writeln!(out, "/// `{}` codes 0..{}.", t.name, t.codes.len()).unwrap();
        writeln!(out, "#[rustfmt::skip]").unwrap();
        writeln!(out, "pub const ARUCO_{n}X{n}_CODES: [u64; {}] = [", t.codes.len()).unwrap();
        for chunk in t.codes.chunks(4) {
            let line: Vec<String> = chunk.iter().map(|c| format!("{c:#014x}")).collect();
            writeln!(out, "    {},", line.join(", ")).unwrap();
        }
        writeln!(out, "];\n").unwrap();
    }

    writeln!(out, "/// Embedded family table for `marker_size`, empty if none.").unwrap();
    writeln!(out, "fn embedded_family(marker_size: usize) -> &'static [u64] {{").unwrap();
    writeln!(out, "    match marker_size {{").unwrap();
    for t in &tables {
        let n = t.marker_size;
        writeln!(out, "        {n} => &ARUCO_{n}X{n}_CODES,").unwrap();
    }
    writeln!(out, "        _ => &[],").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "}}").unwrap();

    let dest = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR")).join("builtins.rs");
    fs::write(&dest, out).unwrap_or_else(|e| panic!("failed to write {}: {e}", dest.display()));
}
