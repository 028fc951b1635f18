use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use song_ranker::catalog::{
    backup_file_name, export_catalog, find_singer, find_singer_mut, import_catalog,
    load_catalog_file, save_catalog_file,
};
use song_ranker::client::SongListClient;
use song_ranker::config::load_config;
use song_ranker::matcher::{
    match_files, selected_files, JsonFileStore, MediaKey, MediaStore, MediaType, ScanEvent,
};
use song_ranker::models::Singer;
use song_ranker::presentation::{
    active_cue, build_countdown, parse_lyric_cues, CountdownPlayer, LyricCue, PlaybackEvent,
};
use song_ranker::ranking::{
    album_rank, enrich, rank_albums, ranking_neighborhood, sort_table, SortDirection, SortField,
    DEFAULT_WINDOW_SIZE,
};

/// How often the countdown clock advances
const TICK: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "song-ranker")]
#[command(about = "Score, rank and count down a singer's discography")]
#[command(version)]
struct Args {
    /// Path to the catalog JSON file (overrides CATALOG_PATH)
    #[arg(short = 'c', long = "catalog")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace the catalog with an exported JSON file
    Import { file: PathBuf },

    /// Write the catalog to a dated backup file
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show a singer's songs as a sorted table
    Rank {
        singer: String,
        #[arg(short, long, value_enum, default_value = "total")]
        sort: SortField,
        #[arg(long)]
        ascending: bool,
    },

    /// Show a singer's albums ranked by average total
    Albums { singer: String },

    /// Show the songs ranked around one song
    Neighbors {
        singer: String,
        song_id: String,
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,
    },

    /// Reveal a singer's songs from worst to best
    Countdown { singer: String },

    /// Print the cues of a lyric file, or the cue active at a time
    Lyrics {
        file: PathBuf,
        #[arg(long)]
        at: Option<f64>,
    },

    /// Link audio and lyric files to a singer's songs
    Link {
        singer: String,
        /// Files and folders; folders are walked
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Fill an album with track titles from the song-list service
    Seed {
        singer: String,
        album: String,
        #[arg(long, default_value = "Unknown")]
        year: String,
    },

    /// Remove a song and release its media links
    Remove { singer: String, song_id: String },

    /// Reset every score of a singer to zero
    ClearScores { singer: String },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config()?;
    let catalog_path = args.catalog.unwrap_or(config.catalog_path.clone());
    let mut catalog = load_catalog_file(&catalog_path)?;
    info!(path = %catalog_path.display(), singers = catalog.len(), "catalog loaded");

    match args.command {
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file '{}'", file.display()))?;
            let imported = import_catalog(&text);
            let songs: usize = imported.iter().map(Singer::song_count).sum();
            save_catalog_file(&catalog_path, &imported)?;
            println!("Imported {} singers, {} songs", imported.len(), songs);
        }

        Command::Export { out } => {
            let out = out.unwrap_or_else(|| {
                PathBuf::from(backup_file_name(chrono::Local::now().date_naive()))
            });
            fs::write(&out, export_catalog(&catalog)?)
                .with_context(|| format!("Failed to write export '{}'", out.display()))?;
            println!("Exported {} singers to {}", catalog.len(), out.display());
        }

        Command::Rank {
            singer,
            sort,
            ascending,
        } => {
            let singer = lookup(&catalog, &singer)?;
            let direction = if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let rows = sort_table(enrich(singer).all_songs, sort, direction);

            println!("{}", singer.name);
            println!("{}", underline(&singer.name));
            for (i, row) in rows.iter().enumerate() {
                let s = &row.song.scores;
                println!(
                    "{:>3}. {:<32} {:>5.2}  (L {:.1} | C {:.1} | A {:.1})  {} [{}]",
                    i + 1,
                    row.song.title,
                    row.total_score,
                    s.lyrics,
                    s.composition,
                    s.arrangement,
                    row.album_name,
                    row.album_year
                );
            }
        }

        Command::Albums { singer } => {
            let singer = lookup(&catalog, &singer)?;
            let ranked = rank_albums(enrich(singer).albums_with_stats);
            for album in &ranked {
                println!(
                    "#{} {} ({}) avg {:.2} | L {:.2} C {:.2} A {:.2} | {} songs",
                    album_rank(&ranked, &album.album.id).unwrap_or_default(),
                    album.album.title,
                    album.album.year,
                    album.average_total,
                    album.average_lyrics,
                    album.average_composition,
                    album.average_arrangement,
                    album.album.songs.len()
                );
            }
        }

        Command::Neighbors {
            singer,
            song_id,
            window,
        } => {
            let singer = lookup(&catalog, &singer)?;
            let entries = ranking_neighborhood(&enrich(singer).all_songs, &song_id, window);
            if entries.is_empty() {
                anyhow::bail!("Song '{}' not found for {}", song_id, singer.name);
            }
            for entry in entries {
                let marker = if entry.is_current { ">" } else { " " };
                println!(
                    "{marker} #{} {} ({:.2})",
                    entry.rank, entry.song.song.title, entry.song.total_score
                );
            }
        }

        Command::Countdown { singer } => {
            let singer = lookup(&catalog, &singer)?;
            let mut player = CountdownPlayer::new(build_countdown(singer), config.countdown_seconds);
            if player.is_finished() {
                println!("{} has no songs to count down.", singer.name);
                return Ok(());
            }

            println!(
                "{} countdown, {}s per song",
                singer.name, config.countdown_seconds
            );
            let store = JsonFileStore::open(&config.media_store_path)?;
            let mut cues = announce(&player, &store);
            let mut shown_cue = None;
            loop {
                thread::sleep(TICK);
                match player.tick(TICK.as_secs_f64()) {
                    PlaybackEvent::Continue => {
                        let cue = active_cue(&cues, player.audio_position());
                        if cue != shown_cue {
                            if let Some(index) = cue {
                                println!("      ♪ {}", cues[index].text);
                            }
                            shown_cue = cue;
                        }
                    }
                    PlaybackEvent::Advanced(_) => {
                        cues = announce(&player, &store);
                        shown_cue = None;
                    }
                    PlaybackEvent::Finished => break,
                }
            }
        }

        Command::Lyrics { file, at } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read lyric file '{}'", file.display()))?;
            let cues = parse_lyric_cues(&text);
            match at {
                Some(position) => match active_cue(&cues, position) {
                    Some(index) => println!("{}", cues[index].text),
                    None => println!("(no lyric yet at {position}s)"),
                },
                None => {
                    for cue in &cues {
                        println!("[{:>7.2}] {}", cue.time, cue.text);
                    }
                }
            }
        }

        Command::Link { singer, paths } => {
            let target = lookup_mut(&mut catalog, &singer)?;
            let songs: Vec<_> = target.songs().cloned().collect();
            let mut store = JsonFileStore::open(&config.media_store_path)?;

            let files = selected_files(paths);

            let outcome = match_files(&songs, files, &mut store, |event| match event {
                ScanEvent::Linked { file, media_type, .. } => {
                    println!("✓ {} ({})", file.name, media_type)
                }
                ScanEvent::Unmatched { file } => println!("- {} (no matching song)", file.name),
                ScanEvent::Failed { file, error, .. } => eprintln!("✗ {}: {}", file.name, error),
            });

            *target = target.clone().apply_song_updates(&outcome.updated_songs);
            save_catalog_file(&catalog_path, &catalog)?;
            println!(
                "Linked {} audio and {} lyric files",
                outcome.matched_audio_count, outcome.matched_lrc_count
            );
        }

        Command::Seed {
            singer,
            album,
            year,
        } => {
            let mut target = match find_singer(&catalog, &singer) {
                Some(existing) => existing.clone(),
                None => Singer::create(singer.as_str()),
            };
            if !target.albums.iter().any(|a| a.id == album || a.title == album) {
                target = target.add_album(album.as_str(), year);
            }
            let album_id = target
                .albums
                .iter()
                .find(|a| a.id == album || a.title == album)
                .map(|a| a.id.clone())
                .context("album missing after creation")?;

            let client = SongListClient::new(config.song_list.clone());
            if !client.is_configured() {
                eprintln!("GEMINI_API_KEY is not set; album created without songs.");
            }
            let titles = client.suggest_titles(&target.name, &album);
            let seeded = titles.len();
            target = target.seed_songs(&album_id, titles);

            match find_singer_mut(&mut catalog, &target.id) {
                Some(slot) => *slot = target,
                None => catalog.push(target),
            }
            save_catalog_file(&catalog_path, &catalog)?;
            println!("Seeded {seeded} songs into '{album}'");
        }

        Command::Remove { singer, song_id } => {
            let target = lookup_mut(&mut catalog, &singer)?;
            let (edited, released) = target.clone().delete_song(&song_id);
            if released.is_empty() {
                anyhow::bail!("Song '{}' not found for {}", song_id, target.name);
            }
            *target = edited;

            let mut store = JsonFileStore::open(&config.media_store_path)?;
            for key in &released {
                store.delete(key)?;
            }
            save_catalog_file(&catalog_path, &catalog)?;
            println!("Removed song {song_id}");
        }

        Command::ClearScores { singer } => {
            let target = lookup_mut(&mut catalog, &singer)?;
            *target = target.clone().clear_scores();
            let name = target.name.clone();
            save_catalog_file(&catalog_path, &catalog)?;
            println!("Cleared all scores for {name}");
        }
    }

    Ok(())
}

fn lookup<'a>(catalog: &'a [Singer], query: &str) -> Result<&'a Singer> {
    find_singer(catalog, query).with_context(|| format!("Singer '{query}' not found"))
}

fn lookup_mut<'a>(catalog: &'a mut [Singer], query: &str) -> Result<&'a mut Singer> {
    find_singer_mut(catalog, query).with_context(|| format!("Singer '{query}' not found"))
}

fn underline(title: &str) -> String {
    "=".repeat(title.chars().count())
}

/// Print the song now on screen and load its linked lyric cues, if any
fn announce(player: &CountdownPlayer, store: &JsonFileStore) -> Vec<LyricCue> {
    let Some(entry) = player.current() else {
        return Vec::new();
    };
    let song = &entry.song.song;
    println!(
        "#{:<3} {} - {} ({:.2}) [{:.0}s]",
        entry.rank,
        song.title,
        entry.song.album_name,
        entry.song.total_score,
        player.remaining_seconds()
    );

    if song.has_lrc != Some(true) {
        return Vec::new();
    }
    let linked = match store.get(&MediaKey::new(song.id.as_str(), MediaType::Lrc)) {
        Ok(Some(linked)) => linked,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(song = %song.title, error = %e, "could not look up lyric link");
            return Vec::new();
        }
    };
    match fs::read_to_string(&linked.path) {
        Ok(text) => parse_lyric_cues(&text),
        Err(e) => {
            warn!(path = %linked.path.display(), error = %e, "could not read linked lyrics");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underline_counts_characters() {
        assert_eq!(underline("Björk"), "=====");
        assert_eq!(underline("坂本龍一"), "====");
        assert_eq!(underline(""), "");
    }

    #[test]
    fn test_cli_accepts_files_and_folders_for_link() {
        let args = Args::try_parse_from(["song-ranker", "link", "Prism", "a.mp3", "live/", "b.lrc"])
            .unwrap();
        match args.command {
            Command::Link { singer, paths } => {
                assert_eq!(singer, "Prism");
                assert_eq!(paths.len(), 3);
            }
            _ => panic!("expected link command"),
        }
    }
}
