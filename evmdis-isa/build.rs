// Build script for evmdis-isa.
//
// Reads `isa/evm.yaml` and writes `generated.rs` into OUT_DIR:
//   - the `OpcodeFlags` bitflags type, one flag per entry of `flags`;
//   - an associated `Opcode` constant per mnemonic;
//   - the 256-entry `OPCODE_TABLE` used by `lookup`.

use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Deserialize)]
struct Isa {
    flags: Vec<String>,
    opcodes: Vec<Entry>,
    #[serde(default)]
    ranges: Vec<Range>,
}

#[derive(Deserialize)]
struct Entry {
    opcode: u8,
    mnemonic: String,
    #[serde(default)]
    flags: Vec<String>,
}

#[derive(Deserialize)]
struct Range {
    first: u8,
    count: u8,
    mnemonic: String,
    #[serde(default = "default_ordinal_base")]
    ordinal_base: u8,
    #[serde(default)]
    immediate: Immediate,
    #[serde(default)]
    flags: Vec<String>,
}

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Immediate {
    #[default]
    None,
    Ordinal,
}

fn default_ordinal_base() -> u8 {
    1
}

struct Row {
    mnemonic: String,
    immediate: u8,
    flags: Vec<String>,
}

fn main() {
    let manifest = env::var("CARGO_MANIFEST_DIR").unwrap();
    let out_dir = env::var("OUT_DIR").unwrap();
    let isa_yaml = format!("{manifest}/isa/evm.yaml");
    println!("cargo:rerun-if-changed={isa_yaml}");

    let text = fs::read_to_string(&isa_yaml)
        .unwrap_or_else(|e| panic!("failed to read {isa_yaml}: {e}"));
    let isa: Isa =
        serde_yaml::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {isa_yaml}: {e}"));

    assert!(
        isa.flags.len() <= 8,
        "OpcodeFlags is a u8; {} flags declared",
        isa.flags.len()
    );

    let mut rows: BTreeMap<u8, Row> = BTreeMap::new();
    for entry in isa.opcodes {
        insert_row(
            &mut rows,
            entry.opcode,
            Row {
                mnemonic: entry.mnemonic,
                immediate: 0,
                flags: entry.flags,
            },
        );
    }
    for range in isa.ranges {
        for index in 0..range.count {
            let opcode = range
                .first
                .checked_add(index)
                .unwrap_or_else(|| panic!("range {} overflows a byte", range.mnemonic));
            let ordinal = range.ordinal_base + index;
            let immediate = match range.immediate {
                Immediate::None => 0,
                Immediate::Ordinal => ordinal,
            };
            insert_row(
                &mut rows,
                opcode,
                Row {
                    mnemonic: range.mnemonic.replace("{n}", &ordinal.to_string()),
                    immediate,
                    flags: range.flags.clone(),
                },
            );
        }
    }

    let mut out = String::new();
    out.push_str("// @generated by build.rs from isa/evm.yaml\n\n");

    out.push_str("bitflags::bitflags! {\n");
    out.push_str("    /// Control-flow properties of an opcode.\n");
    out.push_str("    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]\n");
    out.push_str("    pub struct OpcodeFlags: u8 {\n");
    for (bit, name) in isa.flags.iter().enumerate() {
        writeln!(
            out,
            "        const {} = {:#04x};",
            name.to_uppercase(),
            1u8 << bit
        )
        .unwrap();
    }
    out.push_str("    }\n}\n\n");

    out.push_str("impl Opcode {\n");
    for (opcode, row) in &rows {
        writeln!(
            out,
            "    pub const {}: Opcode = Opcode({opcode:#04x});",
            row.mnemonic
        )
        .unwrap();
    }
    out.push_str("}\n\n");

    out.push_str("static OPCODE_TABLE: [Option<OpcodeInfo>; 256] = [\n");
    for byte in 0..=u8::MAX {
        match rows.get(&byte) {
            Some(row) => {
                let bits = flag_bits(&isa.flags, row);
                writeln!(
                    out,
                    "    Some(OpcodeInfo::new(Opcode({byte:#04x}), \"{}\", {}, OpcodeFlags::from_bits_retain({bits:#04x}))),",
                    row.mnemonic, row.immediate
                )
                .unwrap();
            }
            None => out.push_str("    None,\n"),
        }
    }
    out.push_str("];\n");

    let out_path = PathBuf::from(&out_dir).join("generated.rs");
    fs::write(&out_path, out).expect("failed to write generated.rs");
}

fn insert_row(rows: &mut BTreeMap<u8, Row>, opcode: u8, row: Row) {
    if let Some(existing) = rows.get(&opcode) {
        panic!(
            "opcode {opcode:#04x} defined twice ({} and {})",
            existing.mnemonic, row.mnemonic
        );
    }
    rows.insert(opcode, row);
}

fn flag_bits(declared: &[String], row: &Row) -> u8 {
    row.flags.iter().fold(0u8, |bits, name| {
        let bit = declared
            .iter()
            .position(|d| d == name)
            .unwrap_or_else(|| panic!("{}: unknown flag '{name}'", row.mnemonic));
        bits | (1u8 << bit)
    })
}
