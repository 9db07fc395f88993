use std::path::PathBuf;

use audiosplit_core::DEFAULT_FORMAT;
use clap::{builder::ValueParser, value_parser, Arg, ArgAction, Command};

/// Parse a chunk length given in whole minutes.
pub fn parse_chunk_minutes(value: &str) -> Result<u32, String> {
    let input = value.trim();
    if input.is_empty() {
        return Err("chunk length cannot be empty".into());
    }

    let minutes = input
        .parse::<u32>()
        .map_err(|_| format!("invalid chunk length '{value}', expected whole minutes"))?;
    if minutes == 0 {
        return Err("chunk length must be greater than zero minutes".into());
    }

    Ok(minutes)
}

pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Split audio files into fixed-length chunks")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("length")
                .short('l')
                .long("length")
                .value_name("MINUTES")
                .help("Length of each chunk in minutes")
                .required(true)
                .value_parser(ValueParser::new(parse_chunk_minutes)),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format and file extension (e.g. mp3, flac, wav)")
                .default_value(DEFAULT_FORMAT),
        )
        .arg(
            Arg::new("normalize")
                .short('n')
                .long("normalize")
                .help("Normalize loudness while encoding")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_DIR")
                .help("Directory for the chunks, created if missing [default: current directory]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the chunks that would be written without encoding anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ffmpeg")
                .long("ffmpeg")
                .value_name("PATH")
                .help("ffmpeg executable used for encoding")
                .default_value("ffmpeg")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("ffprobe")
                .long("ffprobe")
                .value_name("PATH")
                .help("ffprobe executable used to read the input duration")
                .default_value("ffprobe")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("file_path")
                .value_name("FILE_PATH")
                .help("Path to the input audio file")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn parse_chunk_minutes_accepts_whole_minutes() {
        assert_eq!(parse_chunk_minutes("10").unwrap(), 10);
        assert_eq!(parse_chunk_minutes(" 1 ").unwrap(), 1);
    }

    #[test]
    fn parse_chunk_minutes_rejects_zero_and_garbage() {
        assert!(parse_chunk_minutes("0").is_err());
        assert!(parse_chunk_minutes("").is_err());
        assert!(parse_chunk_minutes("-5").is_err());
        assert!(parse_chunk_minutes("2.5").is_err());
        assert!(parse_chunk_minutes("10m").is_err());
    }

    #[test]
    fn defaults_apply_when_flags_are_omitted() {
        let matches = build_cli()
            .try_get_matches_from(["audiosplit", "--length", "5", "song.wav"])
            .unwrap();

        assert_eq!(matches.get_one::<u32>("length"), Some(&5));
        assert_eq!(
            matches.get_one::<String>("format").map(String::as_str),
            Some("mp3")
        );
        assert!(!matches.get_flag("normalize"));
        assert!(!matches.get_flag("dry-run"));
        assert!(matches.get_one::<PathBuf>("output").is_none());
        assert_eq!(
            matches.get_one::<PathBuf>("ffmpeg"),
            Some(&PathBuf::from("ffmpeg"))
        );
    }

    #[test]
    fn all_request_fields_can_be_set() {
        let matches = build_cli()
            .try_get_matches_from([
                "audiosplit",
                "-l",
                "15",
                "-f",
                "flac",
                "-n",
                "-o",
                "chunks",
                "talk.wav",
            ])
            .unwrap();

        assert_eq!(matches.get_one::<u32>("length"), Some(&15));
        assert_eq!(
            matches.get_one::<String>("format").map(String::as_str),
            Some("flac")
        );
        assert!(matches.get_flag("normalize"));
        assert_eq!(
            matches.get_one::<PathBuf>("output"),
            Some(&PathBuf::from("chunks"))
        );
        assert_eq!(
            matches.get_one::<PathBuf>("file_path"),
            Some(&PathBuf::from("talk.wav"))
        );
    }

    #[test]
    fn length_is_required() {
        assert!(build_cli()
            .try_get_matches_from(["audiosplit", "song.wav"])
            .is_err());
    }
}
