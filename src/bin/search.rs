// EDICT-Search CLI Tool
// Command-line interface for Japanese-English dictionary lookup

use clap::{ArgAction, Parser, Subcommand};
use edict_search::deinflect::{describe, to_hepburn};
use edict_search::{
    analyze_characters, analyze_words, deinflect, CliOverrides, Config, DictSearch, DictType,
    RomanizationEnum, SearchHit, SearchOptions, SearchQuery,
};
use flexi_logger::Logger;
use std::path::PathBuf;

/// EDICT Search Tool - Japanese-English dictionary lookup
#[derive(Parser, Debug)]
#[command(name = "edict-search")]
#[command(about = "Search EDICT, KANJIDIC and the Tanaka corpus", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file layered over ~/.edict-search/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding edict, kanjidic and examples.utf
    #[arg(long, global = true, value_name = "DIR")]
    dict_dir: Option<PathBuf>,

    /// Romanization system: hepburn, nihon-shiki or kunrei
    #[arg(short, long, global = true)]
    romanization: Option<RomanizationEnum>,

    /// Encoding of the dictionary files, e.g. euc-jp
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for a Japanese word (romaji or kana) or an English word
    Search {
        text: String,
        /// Search English glosses instead of Japanese
        #[arg(short, long)]
        english: bool,
        /// Match whole words only
        #[arg(short = 'x', long)]
        exact: bool,
        /// Reduce an inflected verb or adjective to its dictionary form
        #[arg(short, long)]
        deinflect: bool,
        /// Search the example sentences
        #[arg(long)]
        examples: bool,
        /// Maximum number of results to display
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Look up every kanji of the text in KANJIDIC
    Kanji { text: String },
    /// Break text into characters, or into dictionary words
    Analyze {
        text: String,
        #[arg(short, long)]
        words: bool,
    },
    /// Convert kana to romaji
    Romaji { text: String },
    /// Convert romaji to hiragana (or katakana)
    Kana {
        romaji: String,
        #[arg(short, long)]
        katakana: bool,
    },
    /// Show the dictionary forms an inflected word may come from
    Deinflect { romaji: String },
    /// Build the index caches
    Index {
        /// Only this dictionary: edict, kanjidic or tanaka
        #[arg(long)]
        dict: Option<DictType>,
    },
    /// Print the resolved configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _logger = match Logger::try_with_env_or_str(level).and_then(|l| l.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    run(cli)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = CliOverrides {
        romanization: cli.romanization,
        dict_dir: cli.dict_dir.clone(),
        encoding: cli.encoding.clone(),
        limit: match &cli.command {
            Command::Search { limit, .. } => *limit,
            _ => None,
        },
    };
    let config = Config::load(cli.config.as_deref(), Some(&overrides))?;
    let romanization = config.effective_romanization();

    match cli.command {
        Command::Search {
            text,
            english,
            exact,
            deinflect,
            examples,
            ..
        } => {
            let options = SearchOptions {
                exact,
                deinflect,
                in_examples: examples,
                japanese: !english,
            };
            let Some(query) = options.resolve(&text, romanization) else {
                println!("Nothing to search for.");
                return Ok(());
            };
            let search = DictSearch::from_config(&config);
            let hits = search.search_limit(&query, config.effective_limit())?;
            print_hits(&hits, romanization);
        }
        Command::Kanji { text } => {
            let query = SearchQuery::search_kanji(&text);
            if query.is_empty() {
                println!("No kanji in '{}'.", text);
                return Ok(());
            }
            let search = DictSearch::from_config(&config);
            print_hits(&search.search(&query)?, romanization);
        }
        Command::Analyze { text, words } => {
            let search = DictSearch::from_config(&config);
            if words {
                for word in analyze_words(&text, &search)? {
                    match word.entries.first() {
                        Some(entry) => println!(
                            "{:<10} {}  {}",
                            word.word,
                            entry.format_japanese(),
                            entry.senses().join("; ")
                        ),
                        None => println!("{:<10} -", word.word),
                    }
                }
            } else {
                for item in analyze_characters(&text, &search)? {
                    match (&item.kanji, &item.romaji) {
                        (Some(kanji), _) => println!(
                            "{}  {}  {}",
                            item.character,
                            kanji.reading.as_deref().unwrap_or_default(),
                            kanji.english().join(", ")
                        ),
                        (None, Some(romaji)) => println!("{}  {}", item.character, romaji),
                        (None, None) => println!("{}", item.character),
                    }
                }
            }
        }
        Command::Romaji { text } => {
            println!("{}", romanization.to_romaji(&text));
        }
        Command::Kana { romaji, katakana } => {
            if katakana {
                println!("{}", romanization.to_katakana(&romaji));
            } else {
                println!("{}", romanization.to_hiragana(&romaji));
            }
        }
        Command::Deinflect { romaji } => {
            let hepburn = to_hepburn(&romaji, romanization);
            for d in deinflect(&hepburn) {
                let kana = RomanizationEnum::Hepburn.to_hiragana(&d.form);
                println!(
                    "{:<10} {:<12} {}",
                    kana,
                    romanization.to_romaji(&kana),
                    describe(&d)
                );
            }
        }
        Command::Index { dict } => {
            let search = DictSearch::from_config(&config);
            let targets = match dict {
                Some(dict_type) => vec![dict_type],
                None => DictType::ALL.to_vec(),
            };
            for dict_type in targets {
                let source = search.loader().source_path(dict_type);
                if !source.is_file() {
                    println!("{:<9} missing ({})", dict_type, source.display());
                    continue;
                }
                let stats = search.rebuild_index(dict_type)?;
                println!("{:<9} {} entries, {} keys", dict_type, stats.entries, stats.keys);
            }
        }
        Command::Config { save } => {
            let resolved = Config {
                romanization: Some(romanization),
                dict_dir: Some(config.effective_dict_dir()),
                encoding: Some(config.effective_encoding().name().to_ascii_lowercase()),
                default_limit: Some(config.effective_limit()),
            };
            print!("{}", resolved.to_toml()?);
            if save {
                let path = cli
                    .config
                    .or_else(Config::user_config_path)
                    .ok_or("Cannot determine the config file location")?;
                resolved.save(&path)?;
                println!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Print numbered search results
fn print_hits(hits: &[SearchHit], romanization: RomanizationEnum) {
    if hits.is_empty() {
        println!("No matches found.");
        return;
    }

    for (idx, hit) in hits.iter().enumerate() {
        print!("{}. ", idx + 1);
        match hit {
            SearchHit::Edict(entry) => {
                let reading = entry.reading.as_deref().unwrap_or_else(|| entry.japanese());
                print!(
                    "{}  ({})",
                    entry.format_japanese(),
                    romanization.to_romaji(reading)
                );
                if entry.is_common {
                    print!(" ★");
                }
                println!();
                for sense in entry.senses() {
                    println!("      {}", sense);
                }
            }
            SearchHit::Kanjidic(entry) => {
                println!("{}  {}", entry.kanji_char(), entry.english().join(", "));
                println!("      on:    {}", entry.onyomi().join(", "));
                println!("      kun:   {}", entry.kunyomi().join(", "));
                if !entry.namae().is_empty() {
                    println!("      names: {}", entry.namae().join(", "));
                }
                let mut info = format!("radical {}, {} strokes", entry.radical, entry.strokes);
                if let Some(grade) = entry.grade {
                    info.push_str(&format!(", grade {}", grade));
                }
                if let Some(skip) = &entry.skip {
                    info.push_str(&format!(", SKIP {}", skip));
                }
                println!("      {}", info);
            }
            SearchHit::Tanaka(entry) => {
                println!("{}", entry.sentence());
                println!("      {}", entry.english);
            }
        }
    }
}
