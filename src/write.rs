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

//! Writing system files.

use std::{
    borrow::Cow,
    fmt::Write as _,
    fs::File,
    io::{BufWriter, Cursor, Seek, SeekFrom, Write},
    path::Path,
};

use binrw::{BinWrite, Error as BinError};
use chrono::{Local, NaiveDateTime};
use encoding_rs::{Encoding, UTF_8};
use itertools::zip_eq;
use thiserror::Error as ThisError;

use crate::{
    bytecode::Compressor,
    calendar::{date_time_to_sav, parse_date, parse_date_time},
    dictionary::{self, Dictionary},
    format::MAX_PRINT_STRING_WIDTH,
    message::Warning,
    records::{
        fixed_string, FloatInfoRecord, IntegerInfoRecord, Pad, ProductVersion, RawFormat,
        RawHeader, RawVariableRecord, N_CASES_OFFSET,
    },
    variable::{VarKind, VarSpec, VarWidth},
};

/// Compression bias SPSS-compatible files use.
const BIAS: f64 = 100.0;

/// Version number stamped into the machine integer info record.
const VERSION: ProductVersion = ProductVersion(0, 10, 1);

/// Errors from writing a system file.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The dictionary rejected a variable definition.
    #[error(transparent)]
    Dictionary(#[from] dictionary::Error),

    /// `set_variable` named a variable that was never added.
    #[error("Can not find the variable named {0} in the dictionary.")]
    UnknownVariable(String),

    /// A numeric variable carries a value label whose value is not a
    /// number.
    #[error("Value label value {value:?} for numeric variable {variable} is not a number.")]
    InvalidLabelValue {
        /// The variable's name.
        variable: String,
        /// The offending label value.
        value: String,
    },

    /// The operation is only valid before `start`; the dictionary is
    /// frozen once it has been written.
    #[error("The dictionary has already been written.")]
    AlreadyStarted,

    /// The operation is only valid after `start`.
    #[error("Cases can only be written after start.")]
    NotStarted,

    /// The writer was already finished.
    #[error("The file has already been finished.")]
    Finished,

    /// Writing to the sink failed.  The file is left in an indeterminate
    /// state.
    #[error(transparent)]
    Write(#[from] BinError),
}

/// Options for writing a system file.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Date and time stamped into the header.
    pub timestamp: NaiveDateTime,

    /// Product name written to the header eye-catcher.
    ///
    /// Together with the fixed `@(#) SPSS DATA FILE ` prefix, only the
    /// first 60 bytes are written.
    pub product_name: Cow<'static, str>,

    /// Compression bias.  Fixed at 100.0 for compatibility with SPSS
    /// readers.
    pub bias: f64,

    /// Whether `set_variable` silently skips unknown variable names
    /// instead of failing.
    pub ignore_missing_variables: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            product_name: Cow::from(concat!("sav (Rust) ", env!("CARGO_PKG_VERSION"))),
            bias: BIAS,
            ignore_missing_variables: false,
        }
    }
}

impl WriteOptions {
    /// Constructs a new set of default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `self` with the timestamp to be written set to `timestamp`.
    pub fn with_timestamp(self, timestamp: NaiveDateTime) -> Self {
        Self { timestamp, ..self }
    }

    /// Returns `self` with the product name set to `product_name`.
    pub fn with_product_name(self, product_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            product_name: product_name.into(),
            ..self
        }
    }

    /// Returns `self` with unknown names in `set_variable` skipped instead
    /// of failing.
    pub fn with_ignore_missing_variables(self, ignore_missing_variables: bool) -> Self {
        Self {
            ignore_missing_variables,
            ..self
        }
    }

    /// Constructs a [Writer] over `sink` with these options.
    pub fn writer<W>(self, sink: W) -> Writer<W>
    where
        W: Write + Seek,
    {
        Writer::with_options(self, sink)
    }

    /// Returns a [WriteOptions] with fixed members so that running at
    /// different times or with different crate versions won't change what
    /// is written to the file.
    #[cfg(test)]
    pub(crate) fn reproducible() -> Self {
        use chrono::NaiveDate;
        WriteOptions::new()
            .with_timestamp(
                NaiveDate::from_ymd_opt(2017, 5, 16)
                    .unwrap()
                    .and_hms_opt(11, 17, 31)
                    .unwrap(),
            )
            .with_product_name("sav test data file")
    }
}

/// System file writer.
///
/// The writer owns the sink from construction through
/// [finish](Self::finish).  The sink must support absolute seeks: the
/// header is written with a case-count placeholder that is patched once
/// the count is known, so a pipe will not do.
///
/// Writing proceeds in two phases.  Before [start](Self::start) the
/// dictionary is built with [add_variable](Self::add_variable); `start`
/// writes it out and freezes it.  After `start`, each row is produced by
/// [clear_case](Self::clear_case), some number of
/// [set_variable](Self::set_variable) calls, and one
/// [write_case](Self::write_case).
pub struct Writer<W>
where
    W: Write + Seek,
{
    options: WriteOptions,
    dictionary: Dictionary,
    compressor: Compressor,
    case: Vec<Option<String>>,
    n_cases: u32,
    started: bool,
    encoding: &'static Encoding,
    warn: Box<dyn FnMut(Warning)>,
    inner: Option<W>,
}

impl Writer<BufWriter<File>> {
    /// Creates a writer over a buffered file created at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::create(path).map_err(BinError::from)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W> Writer<W>
where
    W: Write + Seek,
{
    /// Creates a writer over `sink` with default options.
    pub fn new(sink: W) -> Self {
        Self::with_options(WriteOptions::default(), sink)
    }

    fn with_options(options: WriteOptions, sink: W) -> Self {
        Self {
            compressor: Compressor::new(options.bias),
            options,
            dictionary: Dictionary::new(),
            case: Vec::new(),
            n_cases: 0,
            started: false,
            encoding: UTF_8,
            warn: Box::new(|_| ()),
            inner: Some(sink),
        }
    }

    /// Replaces the reporter that receives [Warning] diagnostics.  The
    /// default reporter discards them.
    pub fn set_reporter(&mut self, warn: impl FnMut(Warning) + 'static) {
        self.warn = Box::new(warn);
    }

    /// The dictionary built so far.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The number of cases written so far.
    pub fn n_cases(&self) -> u32 {
        self.n_cases
    }

    /// Adds the variable described by `spec` to the dictionary.
    pub fn add_variable(&mut self, spec: VarSpec) -> Result<(), Error> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        self.dictionary.add(spec, self.warn.as_mut())?;
        Ok(())
    }

    /// Writes the dictionary: the header and the variable, value-label,
    /// machine info, display, name, encoding, and termination records, in
    /// the fixed order the format requires.  Freezes the dictionary.
    pub fn start(&mut self, file_label: &str) -> Result<(), Error> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        self.dictionary.assign_short_names();
        let writer = self.inner.as_mut().ok_or(Error::Finished)?;
        DictionaryWriter {
            options: &self.options,
            dictionary: &self.dictionary,
            encoding: self.encoding,
            file_label,
            writer,
        }
        .write()?;
        self.case = vec![None; self.dictionary.len()];
        self.started = true;
        Ok(())
    }

    /// Forgets any values set for the pending case.
    pub fn clear_case(&mut self) {
        self.case.fill(None);
    }

    /// Sets the pending case's value for the variable named `name`.
    ///
    /// Unknown names fail unless
    /// [ignore_missing_variables](WriteOptions::ignore_missing_variables)
    /// is set, in which case they are skipped.
    pub fn set_variable(&mut self, name: &str, value: impl Into<String>) -> Result<(), Error> {
        if !self.started {
            return Err(Error::NotStarted);
        }
        match self.dictionary.index_of(name) {
            Some(index) => {
                self.case[index] = Some(value.into());
                Ok(())
            }
            None if self.options.ignore_missing_variables => Ok(()),
            None => Err(Error::UnknownVariable(name.into())),
        }
    }

    /// Encodes the pending case into the compressed data stream, in
    /// dictionary order.
    ///
    /// Each variable's value is resolved by precedence: value set for this
    /// case, else the variable's declared default, else missing.  Strings
    /// are truncated to their declared width; numbers and dates that fail
    /// to parse are written as system-missing, with a [Warning] for each.
    pub fn write_case(&mut self) -> Result<(), Error> {
        if !self.started {
            return Err(Error::NotStarted);
        }
        let writer = self.inner.as_mut().ok_or(Error::Finished)?;
        for (variable, value) in zip_eq(self.dictionary.variables(), self.case.iter()) {
            let value = value.as_deref().or(variable.default.as_deref());
            match variable.kind {
                VarKind::String => {
                    let width = variable.width.as_string_width().unwrap_or(0);
                    let mut bytes = value.unwrap_or_default().as_bytes();
                    if bytes.len() > width {
                        bytes = &bytes[..width];
                        (self.warn)(Warning::TruncatedString {
                            variable: variable.name.as_str().into(),
                            width: width as u16,
                        });
                    }
                    // Each segment takes the next 255 bytes of the value
                    // and fills its own element count.
                    for segment in variable.width.segments() {
                        let (piece, rest) = bytes.split_at(bytes.len().min(255));
                        bytes = rest;
                        self.compressor
                            .string(writer, piece, segment.n_chunks().unwrap())?;
                    }
                }
                VarKind::Date | VarKind::DateTime => {
                    match value.filter(|value| !value.is_empty()) {
                        None => self.compressor.missing(writer)?,
                        Some(raw) => {
                            let parsed = match variable.kind {
                                VarKind::Date => parse_date(raw),
                                _ => parse_date_time(raw),
                            };
                            match parsed {
                                Ok(date_time) => self
                                    .compressor
                                    .number(writer, date_time_to_sav(date_time))?,
                                Err(_) => {
                                    let variable_name = variable.name.as_str().to_string();
                                    (self.warn)(if variable.kind == VarKind::Date {
                                        Warning::InvalidDate {
                                            variable: variable_name,
                                            value: raw.into(),
                                        }
                                    } else {
                                        Warning::InvalidDateTime {
                                            variable: variable_name,
                                            value: raw.into(),
                                        }
                                    });
                                    self.compressor.missing(writer)?;
                                }
                            }
                        }
                    }
                }
                VarKind::Numeric => match value.filter(|value| !value.is_empty()) {
                    None => self.compressor.missing(writer)?,
                    Some(raw) => match raw.parse::<f64>() {
                        Ok(number) => self.compressor.number(writer, number)?,
                        Err(_) => {
                            (self.warn)(Warning::InvalidNumber {
                                variable: variable.name.as_str().into(),
                                value: raw.into(),
                            });
                            self.compressor.missing(writer)?;
                        }
                    },
                },
            }
        }
        self.n_cases += 1;
        Ok(())
    }

    /// Finishes the file: flushes the final compressed block and the sink,
    /// then seeks back and patches the case count into the header.
    /// Returns the sink.
    pub fn finish(mut self) -> Result<Option<W>, Error> {
        self.try_finish()
    }

    /// Tries to finish writing the file; see [finish](Self::finish).
    /// Returns `None` if the file was already finished.
    pub fn try_finish(&mut self) -> Result<Option<W>, Error> {
        let Some(mut inner) = self.inner.take() else {
            return Ok(None);
        };
        self.compressor.flush(&mut inner)?;
        inner.flush().map_err(BinError::from)?;
        inner
            .seek(SeekFrom::Start(N_CASES_OFFSET))
            .map_err(BinError::from)?;
        (self.n_cases as i32).write_le(&mut inner)?;
        Ok(Some(inner))
    }
}

impl<W> Drop for Writer<W>
where
    W: Write + Seek,
{
    fn drop(&mut self) {
        let _ = self.try_finish();
    }
}

/// Writes the records that precede case data.
struct DictionaryWriter<'a, W> {
    options: &'a WriteOptions,
    dictionary: &'a Dictionary,
    encoding: &'static Encoding,
    file_label: &'a str,
    writer: &'a mut W,
}

impl<'a, W> DictionaryWriter<'a, W>
where
    W: Write + Seek,
{
    fn write(&mut self) -> Result<(), Error> {
        self.write_header()?;
        self.write_variables()?;
        self.write_value_labels()?;
        self.write_integer_info()?;
        self.write_float_info()?;
        self.write_display_parameters()?;
        self.write_long_variable_names()?;
        self.write_very_long_strings()?;
        self.write_encoding()?;
        self.write_long_string_value_labels()?;
        Ok((999u32, 0u32).write_le(self.writer)?)
    }

    fn write_header(&mut self) -> Result<(), Error> {
        let header = RawHeader {
            magic: *b"$FL2",
            eye_catcher: fixed_string(
                &format!("@(#) SPSS DATA FILE {}", self.options.product_name),
                self.encoding,
            ),
            layout_code: 2,
            nominal_case_size: self.dictionary.case_elements() as i32,
            compression: 1,
            weight_index: 0,
            n_cases: -1,
            bias: self.options.bias,
            creation_date: fixed_string(
                &self.options.timestamp.format("%d %b %y").to_string(),
                self.encoding,
            ),
            creation_time: fixed_string(
                &self.options.timestamp.format("%H:%M:%S").to_string(),
                self.encoding,
            ),
            file_label: fixed_string(self.file_label, self.encoding),
            padding: [0; 3],
        };
        Ok(header.write_le(self.writer)?)
    }

    fn write_variables(&mut self) -> Result<(), Error> {
        for variable in self.dictionary.variables() {
            for (segment, (width, short_name)) in
                zip_eq(variable.width.segments(), &variable.short_names).enumerate()
            {
                let segment_width = width.as_string_width().unwrap_or(0);
                let format = match variable.width {
                    VarWidth::Numeric => RawFormat::from(variable.print_format),
                    VarWidth::String(_) => RawFormat::string_segment(segment_width as u16),
                };
                let has_label = segment == 0 && variable.label.is_some();
                let record = RawVariableRecord {
                    width: segment_width as i32,
                    has_variable_label: has_label as u32,
                    missing_value_code: 0,
                    print_format: format,
                    write_format: format,
                    name: fixed_string(short_name.as_str(), self.encoding),
                };
                (2u32, record).write_le(self.writer)?;

                if has_label {
                    let label = self
                        .encoding
                        .encode(variable.label.as_deref().unwrap_or_default())
                        .0;
                    let padded_len = label.len().next_multiple_of(4);
                    (
                        label.len() as u32,
                        &*label,
                        Pad::zeros(padded_len - label.len()),
                    )
                        .write_le(self.writer)?;
                }

                // One continuation record per trailing 8-byte element.
                if segment_width > 8 {
                    let continuation = (2u32, RawVariableRecord::continuation());
                    for _ in 1..width.n_chunks().unwrap() {
                        continuation.write_le(self.writer)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Writes value label records, except for long string variables, which
    /// get their own record near the end of the dictionary.
    fn write_value_labels(&mut self) -> Result<(), Error> {
        for variable in self.dictionary.variables() {
            if variable.value_labels.is_empty()
                || variable.width.as_string_width().unwrap_or(0) > 8
            {
                continue;
            }

            (3u32, variable.value_labels.len() as u32).write_le(self.writer)?;
            for label in &variable.value_labels {
                match variable.width {
                    VarWidth::Numeric => {
                        let number =
                            label
                                .value
                                .parse::<f64>()
                                .map_err(|_| Error::InvalidLabelValue {
                                    variable: variable.name.as_str().into(),
                                    value: label.value.clone(),
                                })?;
                        number.write_le(self.writer)?;
                    }
                    VarWidth::String(_) => {
                        fixed_string::<8>(&label.value, self.encoding).write_le(self.writer)?;
                    }
                }

                let description = self.encoding.encode(&label.description).0;
                let len = description.len().min(120);
                let padding = (1 + len).next_multiple_of(8) - (1 + len);
                (len as u8, &description[..len], Pad::spaces(padding)).write_le(self.writer)?;
            }
            (4u32, 1u32, variable.index).write_le(self.writer)?;
        }
        Ok(())
    }

    fn write_integer_info(&mut self) -> Result<(), Error> {
        Ok((
            7u32,
            3u32,
            4u32,
            8u32,
            IntegerInfoRecord {
                version: VERSION,
                machine_code: -1,
                floating_point_rep: 1,
                compression_code: 1,
                endianness: {
                    // Always little-endian.
                    2
                },
                character_code: {
                    // Always UTF-8.
                    65001
                },
            },
        )
            .write_le(self.writer)?)
    }

    fn write_float_info(&mut self) -> Result<(), Error> {
        Ok((
            7u32,
            4u32,
            8u32,
            3u32,
            FloatInfoRecord {
                sysmis: -f64::MAX,
                highest: f64::MAX,
                lowest: -f64::MAX,
            },
        )
            .write_le(self.writer)?)
    }

    fn write_display_parameters(&mut self) -> Result<(), Error> {
        let n_segments = self
            .dictionary
            .variables()
            .map(|variable| variable.width.segments().len())
            .sum::<usize>();
        (7u32, 11u32, 4u32, n_segments as u32 * 3).write_le(self.writer)?;
        for variable in self.dictionary.variables() {
            let measure = i32::from(variable.measure);
            for (segment, _) in variable.width.segments().enumerate() {
                match variable.width {
                    VarWidth::String(width) => {
                        let display_width = if segment != 0 {
                            8
                        } else {
                            (width as usize).min(MAX_PRINT_STRING_WIDTH) as i32
                        };
                        (measure, display_width, 0i32).write_le(self.writer)?;
                    }
                    VarWidth::Numeric => (measure, 8i32, 1i32).write_le(self.writer)?,
                }
            }
        }
        Ok(())
    }

    fn write_long_variable_names(&mut self) -> Result<(), Error> {
        let mut s = String::new();
        for (index, variable) in self.dictionary.variables().enumerate() {
            if index > 0 {
                s.push('\t');
            }
            write!(&mut s, "{}={}", &variable.short_names[0], variable.name).unwrap();
        }
        self.write_bytes_record(13, &self.encoding.encode(&s).0)
    }

    fn write_very_long_strings(&mut self) -> Result<(), Error> {
        if !self
            .dictionary
            .variables()
            .any(|variable| variable.width.is_very_long_string())
        {
            return Ok(());
        }

        let mut s = String::new();
        for variable in self.dictionary.variables() {
            if let VarWidth::String(width) = variable.width {
                if variable.width.is_very_long_string() {
                    write!(&mut s, "{}={width:05}\0\t", &variable.short_names[0]).unwrap();
                }
            }
        }
        self.write_bytes_record(14, &self.encoding.encode(&s).0)
    }

    fn write_encoding(&mut self) -> Result<(), Error> {
        self.write_bytes_record(20, self.encoding.name().as_bytes())
    }

    fn write_long_string_value_labels(&mut self) -> Result<(), Error> {
        let mut body = Vec::new();
        let mut cursor = Cursor::new(&mut body);
        for variable in self.dictionary.variables() {
            if variable.value_labels.is_empty()
                || variable.width.as_string_width().unwrap_or(0) <= 8
            {
                continue;
            }

            let name = self.encoding.encode(variable.short_names[0].as_str()).0;
            (
                name.len() as u32,
                &*name,
                variable.width.as_string_width().unwrap_or(0) as u32,
                variable.value_labels.len() as u32,
            )
                .write_le(&mut cursor)?;
            for label in &variable.value_labels {
                let value = self.encoding.encode(&label.value).0;
                let description = self.encoding.encode(&label.description).0;
                (
                    value.len() as u32,
                    &*value,
                    description.len() as u32,
                    &*description,
                )
                    .write_le(&mut cursor)?;
            }
        }
        if body.is_empty() {
            return Ok(());
        }
        self.write_bytes_record(21, &body)
    }

    fn write_bytes_record(&mut self, subtype: u32, bytes: &[u8]) -> Result<(), Error> {
        Ok((7u32, subtype, 1u32, bytes.len() as u32, bytes).write_le(self.writer)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use binrw::BinRead;

    use super::{Error, WriteOptions, Writer};
    use crate::{
        records::RawHeader,
        variable::{VarKind, VarSpec},
    };

    fn test_writer() -> Writer<Cursor<Vec<u8>>> {
        WriteOptions::reproducible().writer(Cursor::new(Vec::new()))
    }

    fn finished(writer: Writer<Cursor<Vec<u8>>>) -> Vec<u8> {
        writer.finish().unwrap().unwrap().into_inner()
    }

    #[test]
    fn header_layout() {
        let mut writer = test_writer();
        writer
            .add_variable(VarSpec::new("age", VarKind::Numeric))
            .unwrap();
        writer.start("a label").unwrap();
        let raw = finished(writer);

        let header = RawHeader::read_le(&mut Cursor::new(&raw)).unwrap();
        assert_eq!(&header.magic, b"$FL2");
        assert!(header.eye_catcher.starts_with(b"@(#) SPSS DATA FILE sav test data file"));
        assert_eq!(header.layout_code, 2);
        assert_eq!(header.nominal_case_size, 1);
        assert_eq!(header.compression, 1);
        assert_eq!(header.weight_index, 0);
        assert_eq!(header.n_cases, 0);
        assert_eq!(header.bias, 100.0);
        assert_eq!(&header.creation_date, b"16 May 17");
        assert_eq!(&header.creation_time, b"11:17:31");
        assert!(header.file_label.starts_with(b"a label "));
        assert_eq!(header.padding, [0; 3]);
    }

    #[test]
    fn finish_twice() {
        let mut writer = test_writer();
        writer.start("").unwrap();
        assert!(writer.try_finish().unwrap().is_some());
        assert!(writer.try_finish().unwrap().is_none());
    }

    #[test]
    fn lifecycle() {
        let mut writer = test_writer();
        assert!(matches!(writer.write_case(), Err(Error::NotStarted)));
        assert!(matches!(
            writer.set_variable("age", "1"),
            Err(Error::NotStarted)
        ));
        writer.start("").unwrap();
        assert!(matches!(writer.start(""), Err(Error::AlreadyStarted)));
        assert!(matches!(
            writer.add_variable(VarSpec::new("age", VarKind::Numeric)),
            Err(Error::AlreadyStarted)
        ));
    }

    #[test]
    fn unknown_variables() {
        let mut writer = test_writer();
        writer
            .add_variable(VarSpec::new("age", VarKind::Numeric))
            .unwrap();
        writer.start("").unwrap();
        assert!(matches!(
            writer.set_variable("bogus", "1"),
            Err(Error::UnknownVariable(_))
        ));

        let mut writer = WriteOptions::reproducible()
            .with_ignore_missing_variables(true)
            .writer(Cursor::new(Vec::new()));
        writer
            .add_variable(VarSpec::new("age", VarKind::Numeric))
            .unwrap();
        writer.start("").unwrap();
        assert!(writer.set_variable("bogus", "1").is_ok());
    }

    #[test]
    fn bad_label_value_fails_start() {
        let mut writer = test_writer();
        writer
            .add_variable(
                VarSpec::new("sex", VarKind::Numeric).with_value_label("male", "M"),
            )
            .unwrap();
        assert!(matches!(
            writer.start(""),
            Err(Error::InvalidLabelValue { .. })
        ));
    }

    #[test]
    fn labels_are_raw_utf8() {
        let mut writer = test_writer();
        writer
            .add_variable(
                VarSpec::new("sex", VarKind::Numeric)
                    .with_label("ĉu vira aŭ ina")
                    .with_value_label("1", "ĉapelo"),
            )
            .unwrap();
        writer.start("").unwrap();
        let raw = finished(writer);

        fn contains(haystack: &[u8], needle: &[u8]) -> bool {
            haystack.windows(needle.len()).any(|w| w == needle)
        }
        assert!(contains(&raw, "ĉu vira aŭ ina".as_bytes()));
        assert!(contains(&raw, "ĉapelo".as_bytes()));
    }

    #[test]
    fn case_count_patched() {
        let mut writer = test_writer();
        writer
            .add_variable(VarSpec::new("age", VarKind::Numeric))
            .unwrap();
        writer.start("").unwrap();
        for age in 0..5 {
            writer.clear_case();
            writer.set_variable("age", age.to_string()).unwrap();
            writer.write_case().unwrap();
        }
        assert_eq!(writer.n_cases(), 5);
        let raw = finished(writer);
        assert_eq!(&raw[80..84], &5i32.to_le_bytes());
    }
}
