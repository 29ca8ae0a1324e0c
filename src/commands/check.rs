//! Validate the content tree

use anyhow::Result;

use crate::content::PostLoader;
use crate::App;

/// Validate the site config and every post descriptor, reporting each
/// failure. Errors if anything is invalid.
pub fn run(app: &App) -> Result<()> {
    let mut failures = 0;

    match app.load_site() {
        Ok(_) => println!("config: ok"),
        Err(e) => {
            failures += 1;
            println!("config: {}", e);
        }
    }

    let loader = PostLoader::new(app);
    let post_failures = loader.validate();
    let posts = loader.load_posts()?;
    println!("posts: {} loadable", posts.len());

    for (path, err) in &post_failures {
        failures += 1;
        println!("post {}: {}", path.display(), err);
    }

    if failures > 0 {
        anyhow::bail!("{} problem(s) found", failures);
    }
    println!("All good.");
    Ok(())
}
