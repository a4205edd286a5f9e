use std::fmt;

use clap::Args;
use comfy_table::Table;

use common::models::{Post, Reel};

use super::{excerpt, ClientOpError};

#[derive(Args, Debug, Clone)]
pub struct Feed {
    /// Show reels instead of the home feed
    #[arg(long, conflicts_with = "saved")]
    pub reels: bool,

    /// Show bookmarked posts
    #[arg(long)]
    pub saved: bool,

    /// Number of pages to fetch
    #[arg(long, default_value = "1")]
    pub pages: u32,

    /// Print raw JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug)]
pub enum FeedItems {
    Posts(Vec<Post>),
    Reels(Vec<Reel>),
}

#[derive(Debug)]
pub struct FeedOutput {
    pub items: FeedItems,
    pub has_more: bool,
    pub json: bool,
}

impl fmt::Display for FeedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.json {
            let rendered = match &self.items {
                FeedItems::Posts(posts) => serde_json::to_string_pretty(posts),
                FeedItems::Reels(reels) => serde_json::to_string_pretty(reels),
            }
            .map_err(|_| fmt::Error)?;
            return write!(f, "{rendered}");
        }

        let mut table = Table::new();
        match &self.items {
            FeedItems::Posts(posts) if posts.is_empty() => return write!(f, "No posts found"),
            FeedItems::Reels(reels) if reels.is_empty() => return write!(f, "No reels found"),
            FeedItems::Posts(posts) => {
                table.set_header(vec!["ID", "AUTHOR", "LIKES", "COMMENTS", "", "CAPTION"]);
                for p in posts {
                    table.add_row(vec![
                        p.id.to_string(),
                        format!("@{}", p.author.username),
                        p.likes_count.to_string(),
                        p.comments_count.to_string(),
                        marks(p.liked, p.saved),
                        excerpt(p.caption.as_deref().unwrap_or_default(), 40),
                    ]);
                }
            }
            FeedItems::Reels(reels) => {
                table.set_header(vec!["ID", "AUTHOR", "LIKES", "", "CAPTION"]);
                for r in reels {
                    table.add_row(vec![
                        r.id.to_string(),
                        format!("@{}", r.author.username),
                        r.likes_count.to_string(),
                        marks(r.liked, r.saved),
                        excerpt(r.caption.as_deref().unwrap_or_default(), 40),
                    ]);
                }
            }
        }
        write!(f, "{table}")?;
        if self.has_more {
            write!(f, "\n(more available, use --pages)")?;
        }
        Ok(())
    }
}

fn marks(liked: bool, saved: bool) -> String {
    let mut out = String::new();
    if liked {
        out.push('♥');
    }
    if saved {
        out.push('★');
    }
    out
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Feed {
    type Error = ClientOpError;
    type Output = FeedOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let posts = pulse.posts();

        if self.reels {
            let mut pager = pulse.pager::<Reel>();
            for _ in 0..self.pages.max(1) {
                if posts.load_reels(&mut pager).await? == 0 && !pager.has_more() {
                    break;
                }
            }
            return Ok(FeedOutput {
                has_more: pager.has_more(),
                items: FeedItems::Reels(pager.items().to_vec()),
                json: self.json,
            });
        }

        let mut pager = pulse.pager::<Post>();
        for _ in 0..self.pages.max(1) {
            let added = if self.saved {
                posts.load_saved(&mut pager).await?
            } else {
                posts.load_feed(&mut pager).await?
            };
            if added == 0 && !pager.has_more() {
                break;
            }
        }
        Ok(FeedOutput {
            has_more: pager.has_more(),
            items: FeedItems::Posts(pager.items().to_vec()),
            json: self.json,
        })
    }
}
