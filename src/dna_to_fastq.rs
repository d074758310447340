
use crate::common::{parse_args, usage_error, PathArgs, FileReader, FileWriter};
use std::io::{self, Write};
use log::{debug, info};

const USAGE: &str = "
Usage:
  convert <input_dna> <output_fastq>

Converts a file of raw DNA sequences, one sequence per line, into FASTQ
format. The record for line N (counting from zero) is named TAG.N, and every
base gets the dummy base quality 'H'. Input and output paths must differ.

A path of \"-\" means standard input or standard output. Paths that begin
with a dash must follow a \"--\" argument, as in: convert -- -reads.txt out.fq
";

const TAG: &str = "TAG";
const DUMMY_BASEQ: u8 = b'H';

pub fn main() {
	let args = parse_args(USAGE);
	if args.get_str("<input_dna>") == args.get_str("<output_fastq>") {
		usage_error(USAGE);
	}

	// Input is opened first so that a missing input never clobbers the output.
	let mut dna = FileReader::new(&args.get_path("<input_dna>"));
	let mut fastq = FileWriter::new(&args.get_path("<output_fastq>"));
	info!("Converting {} into FASTQ file {}", dna.path(), fastq.path());

	let records = write_fastq(&mut dna, &mut fastq)
		.and_then(|records| fastq.flush().map(|_| records))
		.unwrap_or_else(|e| error!("Cannot write to file {}: {}", fastq.path(), e));
	debug!("Read {} lines from {}", records, dna.path());

	println!("Done!");
	println!("Written {} FASTQ records", records);
}

// Every line becomes one record, whatever it contains.
pub fn write_fastq<W: Write>(dna: &mut FileReader, out: &mut W) -> io::Result<u64> {
	let mut records: u64 = 0;
	let mut line: Vec<u8> = Vec::new();
	while dna.read_line(&mut line) {
		write_record(out, records, &line)?;
		records += 1;
	}
	Ok(records)
}

// The sequence line is written exactly as read, terminator included, and the
// quality string is one byte shorter than that line.
pub fn write_record<W: Write>(out: &mut W, index: u64, line: &[u8]) -> io::Result<()> {
	let qual_len = line.len().saturating_sub(1);
	write!(out, "@{}.{}\n", TAG, index)?;
	out.write_all(line)?;
	out.write_all(b"+\n")?;
	out.write_all(&vec![DUMMY_BASEQ; qual_len])?;
	out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn convert_bytes(input: &[u8]) -> (u64, Vec<u8>) {
		let mut dna = FileReader::from_bufread("mem", Box::new(Cursor::new(input.to_vec())));
		let mut out: Vec<u8> = Vec::new();
		let records = write_fastq(&mut dna, &mut out).unwrap();
		(records, out)
	}

	fn convert(input: &str) -> (u64, String) {
		let (records, out) = convert_bytes(input.as_bytes());
		(records, String::from_utf8(out).unwrap())
	}

	#[test]
	fn two_lines() {
		let (records, fastq) = convert("ACGT\nGGCC\n");
		assert_eq!(records, 2);
		assert_eq!(fastq, "@TAG.0\nACGT\n+\nHHH\n@TAG.1\nGGCC\n+\nHHH\n");
	}

	#[test]
	fn empty_input() {
		let (records, fastq) = convert("");
		assert_eq!(records, 0);
		assert!(fastq.is_empty());
	}

	#[test]
	fn last_line_without_newline_is_written_verbatim() {
		let (records, fastq) = convert("ACGT\nGGCC");
		assert_eq!(records, 2);
		assert_eq!(fastq, "@TAG.0\nACGT\n+\nHHH\n@TAG.1\nGGCC+\nHHH\n");
	}

	#[test]
	fn crlf_terminator_counts_toward_quality_length() {
		let (_, fastq) = convert("ACGT\r\n");
		assert_eq!(fastq, "@TAG.0\nACGT\r\n+\nHHHHH\n");
	}

	#[test]
	fn blank_line_gets_empty_quality() {
		let (records, fastq) = convert("\nAC\n");
		assert_eq!(records, 2);
		assert_eq!(fastq, "@TAG.0\n\n+\n\n@TAG.1\nAC\n+\nH\n");
	}

	#[test]
	fn non_dna_characters_pass_through() {
		let (_, fastq) = convert("hello world\n");
		assert_eq!(fastq, "@TAG.0\nhello world\n+\nHHHHHHHHHHH\n");
	}

	#[test]
	fn headers_count_from_zero() {
		let input: String = (0..12).map(|_| "A\n").collect();
		let (records, fastq) = convert(&input);
		assert_eq!(records, 12);
		let headers: Vec<&str> = fastq.lines().step_by(4).collect();
		let expected: Vec<String> = (0..12).map(|i| format!("@TAG.{}", i)).collect();
		assert_eq!(headers, expected);
	}

	#[test]
	fn write_record_uses_given_index() {
		let mut out: Vec<u8> = Vec::new();
		write_record(&mut out, 41, b"TTAG\n").unwrap();
		assert_eq!(out, b"@TAG.41\nTTAG\n+\nHHH\n");
	}

	#[test]
	fn invalid_utf8_is_copied_through() {
		let (records, fastq) = convert_bytes(b"ACGT\nAC\xffGT\nGGCC\n");
		assert_eq!(records, 3);
		assert_eq!(fastq.as_slice(),
			&b"@TAG.0\nACGT\n+\nHHH\n@TAG.1\nAC\xffGT\n+\nHHHHH\n@TAG.2\nGGCC\n+\nHHH\n"[..]);
	}

	#[test]
	fn quality_length_counts_bytes_not_characters() {
		// 'é' is two bytes in UTF-8.
		let (_, fastq) = convert("AéT\n");
		assert_eq!(fastq, "@TAG.0\nAéT\n+\nHHHH\n");
	}
}
