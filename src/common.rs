
use docopt::{Docopt, ArgvMap};
use std::process::{Child, Command, Stdio};
use std::io::{self, stdin, stdout, BufRead, BufReader, BufWriter, Write};
use std::fs::File;

macro_rules! error {
	($($arg:tt)+) => ({
		use std::process::exit;
		eprint!("ERROR: "); eprintln!($($arg)+); exit(-1);
	})
}

// Invalid invocations exit with status 1 and leave every file alone.
pub fn usage_error(usage: &str) -> ! {
	println!("{}", usage.trim());
	std::process::exit(1);
}

pub fn parse_args(usage: &str) -> ArgvMap {
	parse_argv(usage, std::env::args()).unwrap_or_else(|| usage_error(usage))
}

pub fn parse_argv<I, S>(usage: &str, argv: I) -> Option<ArgvMap>
	where I: IntoIterator<Item=S>, S: AsRef<str> {
	let argv: Vec<String> = argv.into_iter().map(|a| a.as_ref().to_string()).collect();
	Docopt::new(usage).ok()?.argv(argv).help(false).parse().ok()
}

pub trait PathArgs {
	fn get_path(&self, arg: &str) -> String;
}

impl PathArgs for ArgvMap {
	#[allow(deprecated)]
	fn get_path(&self, arg: &str) -> String {
		let path = self.get_str(arg);
		if path.starts_with('~') {
			if let Some(home) = std::env::home_dir() {
				return format!("{}{}", home.display(), &path[1..]);
			}
		}
		path.into()
	}
}

pub struct FileReader {
	path: String,
	bufread: Box<dyn BufRead>,
	gunzip: Option<Child>
}

impl FileReader {
	pub fn new(path: &str) -> FileReader {
		if path == "-" {
			return FileReader::from_bufread(path, Box::new(BufReader::new(stdin())));
		}
		let file = File::open(path).unwrap_or_else(
			|_| error!("Cannot open file {} for reading.", path));
		if path.ends_with(".gz") {
			let mut gunzip = Command::new("gunzip").arg("-c")
				.stdout(Stdio::piped()).stdin(file).spawn()
				.unwrap_or_else(|_| error!("Cannot start gunzip process."));
			let output = gunzip.stdout.take()
				.unwrap_or_else(|| error!("Cannot read gunzip output."));
			FileReader {
				path: path.into(),
				bufread: Box::new(BufReader::new(output)),
				gunzip: Some(gunzip)
			}
		} else {
			FileReader::from_bufread(path, Box::new(BufReader::new(file)))
		}
	}

	pub fn from_bufread(path: &str, bufread: Box<dyn BufRead>) -> FileReader {
		FileReader { path: path.into(), bufread, gunzip: None }
	}

	pub fn path(&self) -> &str { &self.path }

	// Lines are raw bytes and keep their terminator. Returns false at end of
	// file, after gunzip (if any) has exited cleanly.
	pub fn read_line(&mut self, line: &mut Vec<u8>) -> bool {
		line.clear();
		match self.bufread.read_until(b'\n', line) {
			Ok(0) => { self.finish(); false },
			Ok(_) => true,
			Err(e) => { error!("I/O error while reading from file {}: {}", self.path, e); }
		}
	}

	fn finish(&mut self) {
		if let Some(mut gunzip) = self.gunzip.take() {
			match gunzip.wait() {
				Ok(status) if status.success() => {},
				_ => error!("Cannot decompress file {}.", self.path)
			}
		}
	}
}

// "-" writes to standard output.
pub struct FileWriter {
	path: String,
	bufwrite: BufWriter<Box<dyn Write>>
}

impl FileWriter {
	pub fn new(path: &str) -> FileWriter {
		let out: Box<dyn Write> = if path == "-" {
			Box::new(stdout())
		} else {
			Box::new(File::create(path).unwrap_or_else(
				|_| error!("Cannot open file {} for writing.", path)))
		};
		FileWriter { path: path.into(), bufwrite: BufWriter::new(out) }
	}

	pub fn path(&self) -> &str { &self.path }
}

impl Write for FileWriter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.bufwrite.write(buf)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.bufwrite.flush()
	}
}
