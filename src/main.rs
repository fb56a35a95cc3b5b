use std::error::Error;

use librebook_fetch::{prompt_line, LibreBookCrawler, PopularNovelsOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let crawler = LibreBookCrawler::new();

    loop {
        println!("\n=== librebook-fetch ===");
        let term = prompt_line("Search term (empty for the popular listing): ")?;

        let result = if term.is_empty() {
            crawler
                .popular_novels(1, &PopularNovelsOptions::default())
                .await
        } else {
            crawler.search_novels(&term, 1).await
        };

        match result {
            Ok(novels) => {
                if novels.is_empty() {
                    println!("Nothing found.");
                }
                for novel in &novels {
                    println!("  {} ({})", novel.name, novel.path);
                }
            }
            Err(error) => println!("Listing failed: {error}"),
        }

        let path = prompt_line("\nNovel path to inspect (empty to skip): ")?;
        if !path.is_empty() {
            match crawler.parse_novel(&path).await {
                Ok(novel) => {
                    println!("\nTitle: {}", novel.name);
                    if let Some(author) = &novel.author {
                        println!("Author: {author}");
                    }
                    if !novel.genres.is_empty() {
                        println!("Genres: {}", novel.genres);
                    }
                    println!("Status: {:?}", novel.status);
                    if let Some(summary) = &novel.summary {
                        println!("Summary: {summary}");
                    }
                    println!("Chapters: {}", novel.chapters.len());
                    for chapter in novel.chapters.iter().take(5) {
                        match &chapter.release_time {
                            Some(date) => println!(
                                "  {:>3}. {} ({date})",
                                chapter.chapter_number, chapter.name
                            ),
                            None => println!("  {:>3}. {}", chapter.chapter_number, chapter.name),
                        }
                    }
                    if novel.chapters.len() > 5 {
                        println!("  ... and {} more", novel.chapters.len() - 5);
                    }
                }
                Err(error) => println!("Failed to parse {path}: {error}"),
            }
        }

        let again = prompt_line("\nContinue? (y/n): ")?;
        if again.to_lowercase() != "y" {
            break;
        }
    }

    Ok(())
}
