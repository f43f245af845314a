// sav - a library for writing SPSS system files.
// Copyright (C) 2025 Free Software Foundation, Inc.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! End-to-end checks on whole written files.

use std::{cell::RefCell, io::Cursor, rc::Rc};

use binrw::BinRead;
use sav::{
    records::{RawHeader, RawVariableRecord},
    VarKind, VarSpec, Warning, Writer,
};

fn writer() -> Writer<Cursor<Vec<u8>>> {
    Writer::new(Cursor::new(Vec::new()))
}

fn finished(writer: Writer<Cursor<Vec<u8>>>) -> Vec<u8> {
    writer.finish().unwrap().unwrap().into_inner()
}

fn n_cases(raw: &[u8]) -> i32 {
    i32::from_le_bytes(raw[80..84].try_into().unwrap())
}

const TERMINATION: [u8; 8] = [0xe7, 0x03, 0, 0, 0, 0, 0, 0];

/// Returns the compressed case data, everything after the termination
/// record.
fn case_data(raw: &[u8]) -> &[u8] {
    let at = raw
        .windows(TERMINATION.len())
        .position(|window| window == TERMINATION)
        .expect("no termination record");
    &raw[at + TERMINATION.len()..]
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// An empty file: no variables, no cases, but a complete dictionary.
#[test]
fn empty_file() {
    let mut writer = writer();
    writer.start("empty").unwrap();
    let raw = finished(writer);

    assert!(raw.len() >= 176);
    assert_eq!(&raw[..4], b"$FL2");
    assert_eq!(n_cases(&raw), 0);
    assert!(raw.ends_with(&TERMINATION));
}

/// A single numeric variable with a value and a missing case.
#[test]
fn single_numeric() {
    let mut writer = writer();
    writer
        .add_variable(
            VarSpec::new("age", VarKind::Numeric)
                .with_width(8)
                .with_decimals(0),
        )
        .unwrap();
    writer.start("ages").unwrap();

    writer.clear_case();
    writer.set_variable("age", "42").unwrap();
    writer.write_case().unwrap();

    writer.clear_case();
    writer.set_variable("age", "").unwrap();
    writer.write_case().unwrap();

    let raw = finished(writer);
    assert_eq!(n_cases(&raw), 2);
    let data = case_data(&raw);
    assert_eq!(data[0], 142);
    assert_eq!(data[1], 255);
}

/// A short string encodes as a literal chunk, padded with spaces.
#[test]
fn short_string() {
    let mut writer = writer();
    writer
        .add_variable(VarSpec::new("code", VarKind::String).with_width(4))
        .unwrap();
    writer.start("codes").unwrap();

    writer.clear_case();
    writer.set_variable("code", "ok").unwrap();
    writer.write_case().unwrap();

    let raw = finished(writer);
    let header = RawHeader::read_le(&mut Cursor::new(&raw)).unwrap();
    assert_eq!(header.nominal_case_size, 1);

    let data = case_data(&raw);
    assert_eq!(data[..8], [253, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&data[8..16], b"ok      ");
}

/// A very long string spans three segments with the right number of
/// continuation records, and is declared in the very-long-string record.
#[test]
fn very_long_string() {
    let mut writer = writer();
    writer
        .add_variable(VarSpec::new("essay", VarKind::String).with_width(600))
        .unwrap();
    assert_eq!(
        writer
            .dictionary()
            .get("essay")
            .unwrap()
            .width
            .segments()
            .len(),
        3
    );
    writer.start("essays").unwrap();

    writer.clear_case();
    writer.set_variable("essay", "it was a dark and stormy night").unwrap();
    writer.write_case().unwrap();

    let raw = finished(writer);

    // Walk the variable records: 255 and 31 continuations, twice, then 96
    // and 11 continuations.
    let mut cursor = Cursor::new(&raw[176..]);
    let mut widths = Vec::new();
    while u32::read_le(&mut cursor).unwrap() == 2 {
        widths.push(RawVariableRecord::read_le(&mut cursor).unwrap().width);
    }
    let mut expected = Vec::new();
    for segment_width in [255, 255, 96] {
        expected.push(segment_width);
        expected.extend(std::iter::repeat(-1).take((segment_width as usize).div_ceil(8) - 1));
    }
    assert_eq!(widths, expected);

    assert!(contains(&raw, b"ESSAY0=00600\x00\t"));

    // One case: 32 + 32 + 12 elements.
    let data = case_data(&raw);
    let opcodes = data.len() / 8;
    assert!(opcodes >= (32 + 32 + 12) / 8);
}

/// Value labels on a short numeric variable.
#[test]
fn value_labels() {
    let mut writer = writer();
    writer
        .add_variable(
            VarSpec::new("sex", VarKind::Numeric)
                .with_value_label("1", "M")
                .with_value_label("2", "F"),
        )
        .unwrap();
    writer.start("").unwrap();
    let index = writer.dictionary().get("sex").unwrap().index;
    assert_eq!(index, 1);
    let raw = finished(writer);

    // Label record: rec_type 3, two labels, the first for the value 1.0.
    let mut label_record = Vec::new();
    label_record.extend_from_slice(&3u32.to_le_bytes());
    label_record.extend_from_slice(&2u32.to_le_bytes());
    label_record.extend_from_slice(&1.0f64.to_le_bytes());
    assert!(contains(&raw, &label_record));

    // Variable record: rec_type 4, one variable, its element index.
    let mut variable_record = Vec::new();
    variable_record.extend_from_slice(&4u32.to_le_bytes());
    variable_record.extend_from_slice(&1u32.to_le_bytes());
    variable_record.extend_from_slice(&index.to_le_bytes());
    assert!(contains(&raw, &variable_record));
}

/// Dates encode as seconds from 14 Oct 1582; unparseable dates become
/// system-missing with a diagnostic.
#[test]
fn dates() {
    let warnings = Rc::new(RefCell::new(Vec::new()));
    let mut writer = writer();
    let sink = Rc::clone(&warnings);
    writer.set_reporter(move |warning| sink.borrow_mut().push(warning));
    writer
        .add_variable(VarSpec::new("dob", VarKind::Date))
        .unwrap();
    writer.start("").unwrap();

    writer.clear_case();
    writer.set_variable("dob", "1-Jan-1970").unwrap();
    writer.write_case().unwrap();

    writer.clear_case();
    writer.set_variable("dob", "bogus").unwrap();
    writer.write_case().unwrap();

    let raw = finished(writer);
    let data = case_data(&raw);
    assert_eq!(data[0], 253);
    assert_eq!(data[1], 255);
    assert_eq!(data[8..16], 12_219_379_200.0f64.to_le_bytes());

    assert_eq!(
        *warnings.borrow(),
        vec![Warning::InvalidDate {
            variable: String::from("dob"),
            value: String::from("bogus"),
        }]
    );
}

/// Short names stay unique and well-formed even when bases collide.
#[test]
fn short_names() {
    let mut writer = writer();
    for name in ["result_a", "result_b", "result_c", "1result"] {
        writer
            .add_variable(VarSpec::new(name, VarKind::Numeric))
            .unwrap();
    }
    writer
        .add_variable(VarSpec::new("result_essay", VarKind::String).with_width(600))
        .unwrap();
    writer.start("").unwrap();

    let shorts = writer.dictionary().short_names();
    // 4 numerics plus 3 segments.
    assert_eq!(shorts.len(), 7);
    for (name, _) in shorts.iter() {
        assert!(name.len() <= 8);
        assert!(
            name.starts_with('@') || !name.chars().any(|c| c.is_ascii_lowercase()),
            "{name} is not uppercase"
        );
    }
    finished(writer);
}

/// A declared default fills in omitted variables.
#[test]
fn defaults() {
    let mut writer = writer();
    writer
        .add_variable(VarSpec::new("answer", VarKind::Numeric).with_default("7"))
        .unwrap();
    writer.start("").unwrap();

    writer.clear_case();
    writer.write_case().unwrap();

    let raw = finished(writer);
    assert_eq!(case_data(&raw)[0], 107);
}

/// Values longer than the declared width are truncated, with a diagnostic.
#[test]
fn truncation() {
    let warnings = Rc::new(RefCell::new(Vec::new()));
    let mut writer = writer();
    let sink = Rc::clone(&warnings);
    writer.set_reporter(move |warning| sink.borrow_mut().push(warning));
    writer
        .add_variable(VarSpec::new("code", VarKind::String).with_width(4))
        .unwrap();
    writer.start("").unwrap();

    writer.clear_case();
    writer.set_variable("code", "toolong").unwrap();
    writer.write_case().unwrap();

    let raw = finished(writer);
    let data = case_data(&raw);
    assert_eq!(&data[8..16], b"tool    ");
    assert_eq!(
        *warnings.borrow(),
        vec![Warning::TruncatedString {
            variable: String::from("code"),
            width: 4,
        }]
    );
}
