use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use array_literal::decode::bound_decoration;
use array_literal::{
    ArrayCodec, ArrayValue, Dialect, Dimension, Element, ElementKind, KindCodec, Shape,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "arrlit", version, about = "Array literal encoder/decoder")]
struct Args {
    /// Input file path (.json or .arr). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode: JSON array in, literal out.
    #[arg(short = 'e', long)]
    encode: bool,

    /// Force decode mode: literal in, JSON out.
    #[arg(short = 'd', long)]
    decode: bool,

    /// Element kind: bool, int2, int4, int8, float4, float8, numeric, text, bytea, enum, box, record.
    #[arg(short, long, value_name = "kind", value_parser = parse_kind, default_value = "text")]
    kind: ElementKind,

    /// Number of dimensions, or "unlimited".
    #[arg(long, value_name = "n", value_parser = parse_dimension, default_value = "unlimited")]
    dims: Dimension,

    /// Quoting and delimiter conventions.
    #[arg(long, value_enum, value_name = "dialect", default_value_t = DialectArg::Postgres)]
    dialect: DialectArg,

    /// Reject NULL elements when decoding.
    #[arg(long = "non-null")]
    non_null: bool,

    /// Allowed labels for the enum kind, comma separated.
    #[arg(long, value_name = "labels", value_delimiter = ',')]
    labels: Vec<String>,

    /// JSON indentation when decoding (0 for compact output).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DialectArg {
    Postgres,
    Standard,
}

impl From<DialectArg> for Dialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Standard => Dialect::Standard,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(&args, &input_source, &input_text)?;
    let codec = build_codec(&args);

    let output = match mode {
        Mode::Encode => run_encode(&codec, &input_text)?,
        Mode::Decode => run_decode(&args, &codec, &input_text)?,
    };

    let output_target = OutputTarget::from_arg(args.output.as_deref());
    with_output_writer(output_target.path(), |writer| {
        writer.write_all(output.as_bytes())?;
        Ok(())
    })?;
    if let OutputTarget::File(path) = &output_target {
        report_status(mode, &input_source, path);
    }
    Ok(())
}

fn build_codec(args: &Args) -> ArrayCodec {
    let shape = Shape {
        kind: args.kind,
        dimension: args.dims,
    };
    let element = if args.kind == ElementKind::Enum && !args.labels.is_empty() {
        KindCodec::enumeration(args.labels.iter().map(String::as_str))
    } else {
        KindCodec::new(args.kind)
    };
    ArrayCodec::with_element(shape, args.dialect.into(), element)
}

fn run_encode(codec: &ArrayCodec, input: &str) -> Result<String, Box<dyn Error>> {
    let json: Value = serde_json::from_str(input)?;
    let value = json_to_array(&json, codec.shape().kind)?;
    Ok(codec.encode(&value)?)
}

fn run_decode(args: &Args, codec: &ArrayCodec, input: &str) -> Result<String, Box<dyn Error>> {
    let text = input.trim_end_matches(['\n', '\r']);
    let value = if args.non_null {
        codec.decode_non_null(text)?
    } else {
        codec.decode(text)?
    };
    let mut out = Vec::new();
    write_json(&mut out, &value, args.indent)?;
    Ok(String::from_utf8(out)?)
}

/// JSON arrays become array levels; anything else is a leaf of `kind`.
fn json_to_array(json: &Value, kind: ElementKind) -> Result<ArrayValue<Element>, Box<dyn Error>> {
    match json {
        Value::Null => Ok(ArrayValue::Null),
        Value::Array(items) => Ok(ArrayValue::Array(
            items
                .iter()
                .map(|item| json_to_array(item, kind))
                .collect::<Result<_, _>>()?,
        )),
        other => Ok(ArrayValue::Element(Element::from_json(kind, other)?)),
    }
}

fn resolve_mode(
    args: &Args,
    input_source: &InputSource,
    input: &str,
) -> Result<Mode, Box<dyn Error>> {
    if args.encode {
        return Ok(Mode::Encode);
    }

    if args.decode {
        return Ok(Mode::Decode);
    }

    match input_source {
        InputSource::Stdin => Ok(sniff_mode(input)),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Mode::Encode),
            Some("arr") => Ok(Mode::Decode),
            _ => Ok(sniff_mode(input)),
        },
    }
}

/// Literals start with `{` or a `[l:u]` bound decoration; everything else is JSON.
fn sniff_mode(input: &str) -> Mode {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        return Mode::Decode;
    }
    let is_decoration = matches!(
        bound_decoration(trimmed, 0, trimmed.len()),
        Ok((Some(_), _))
    );
    if is_decoration {
        Mode::Decode
    } else {
        Mode::Encode
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

fn parse_kind(raw: &str) -> Result<ElementKind, String> {
    ElementKind::from_name(raw).ok_or_else(|| {
        let names: Vec<_> = ElementKind::ALL.iter().map(|kind| kind.name()).collect();
        format!(
            "Invalid kind \"{raw}\". Valid kinds are: {}",
            names.join(", ")
        )
    })
}

fn parse_dimension(raw: &str) -> Result<Dimension, String> {
    if raw.eq_ignore_ascii_case("unlimited") {
        return Ok(Dimension::Unlimited);
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Dimension::Fixed(n)),
        _ => Err(format!(
            "Invalid dimension \"{raw}\". Use a positive number or \"unlimited\""
        )),
    }
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json<T: Serialize>(
    writer: &mut dyn Write,
    value: &T,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

fn report_status(mode: Mode, input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Stdin => "stdin".to_string(),
        InputSource::File(path) => display_path(path),
    };
    let output_label = display_path(output_path);
    let verb = match mode {
        Mode::Encode => "Encoded",
        Mode::Decode => "Decoded",
    };
    println!("✔ {verb} {input_label} → {output_label}");
}

fn display_path(path: &str) -> String {
    let path = Path::new(path);
    let Ok(cwd) = std::env::current_dir() else {
        return path.to_string_lossy().into_owned();
    };
    match path.strip_prefix(&cwd) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
