// src/sync/mapper.rs
//! Walks the remote page tree and projects it onto the filesystem.
//!
//! Traversal is depth-first and sequential. Each page is rendered and
//! written before any of its children are visited, so a parent only ever
//! depends on its children's titles and slugs. A page whose fetch fails
//! permanently keeps its old files and its place in the tree, and is
//! reported; its siblings are still visited. A nested block that fails
//! permanently is left empty and reported against its page. Filesystem
//! failures abort.

use super::context::TraversalContext;
use super::document::{assemble_document, ContentsLink, FrontMatter};
use crate::api::TreeFetcher;
use crate::constants::DEFAULT_BLOCK_DEPTH;
use crate::error::AppError;
use crate::formatting::{render_blocks, ChildPagePolicy, RenderContext};
use crate::model::Block;
use crate::output::{
    content_digest, index_path, slugify, write_atomic, ChangeDecision, ChangeDetector, HashIndex,
};
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Knobs for a mapping run.
#[derive(Debug, Clone)]
pub struct MapperOptions {
    /// How deep nested blocks are expanded inside one page
    pub block_depth: u8,
    pub child_pages: ChildPagePolicy,
    /// Titles excluded from the tree, wherever they appear
    pub skip_titles: Vec<String>,
    /// Decide everything, write nothing
    pub dry_run: bool,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            block_depth: DEFAULT_BLOCK_DEPTH,
            child_pages: ChildPagePolicy::default(),
            skip_titles: Vec::new(),
            dry_run: false,
        }
    }
}

/// A synced page and its synced descendants.
#[derive(Debug, Clone)]
pub struct PageNode {
    pub id: NotionId,
    pub title: String,
    pub slug: String,
    /// Directory holding this page's `index.md`
    pub dir: PathBuf,
    pub category: Option<String>,
    pub children: Vec<PageNode>,
    /// Rendered body without front matter or contents section
    pub body: String,
    /// Digest of the full document
    pub digest: String,
    /// `None` when the page could not be synced this run
    pub decision: Option<ChangeDecision>,
    /// Part of the page's content was dropped after retries ran out
    pub degraded: bool,
}

impl PageNode {
    /// Stand-in for a page whose sync failed, so that it stays in the
    /// navigation next to the files it left behind.
    fn failed(page: PageRef, slug: String, dir: PathBuf, category: Option<String>) -> Self {
        Self {
            id: page.id,
            title: page.title,
            slug,
            dir,
            category,
            children: Vec::new(),
            body: String::new(),
            digest: String::new(),
            decision: None,
            degraded: false,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.decision.is_some()
    }

    pub fn path(&self) -> PathBuf {
        index_path(&self.dir)
    }

    /// This node and all its descendants, parents before children.
    pub fn walk(&self) -> Vec<&PageNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }
}

/// A page that could not be synced.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFailure {
    pub title: String,
    pub id: NotionId,
    pub error: String,
}

/// Result of a mapping run.
#[derive(Debug)]
pub struct SiteMap {
    pub root: PageNode,
    pub failures: Vec<PageFailure>,
    /// Digests to persist for the next run
    pub hashes: HashIndex,
    pub files_written: usize,
}

#[derive(Debug, Clone)]
struct PageRef {
    id: NotionId,
    title: String,
    last_edited: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct ChildPlan {
    page: PageRef,
    slug: String,
    dir: PathBuf,
}

#[derive(Debug, Default)]
struct MapState {
    failures: Vec<PageFailure>,
    hashes: HashIndex,
    files_written: usize,
}

pub struct SiteMapper<'a> {
    fetcher: &'a TreeFetcher,
    detector: &'a ChangeDetector,
    options: &'a MapperOptions,
}

impl<'a> SiteMapper<'a> {
    pub fn new(
        fetcher: &'a TreeFetcher,
        detector: &'a ChangeDetector,
        options: &'a MapperOptions,
    ) -> Self {
        Self {
            fetcher,
            detector,
            options,
        }
    }

    /// Syncs the tree under `root_id` into `output_dir`.
    ///
    /// Failing to read the root page or its children is fatal; failures
    /// further down are collected in [`SiteMap::failures`].
    pub async fn map(&self, root_id: &NotionId, output_dir: &Path) -> Result<SiteMap, AppError> {
        let summary = self.fetcher.fetch_page(root_id).await?;
        log::info!("Syncing '{}' into {}", summary.title, output_dir.display());

        let root = PageRef {
            id: summary.id,
            title: summary.title,
            last_edited: summary.last_edited,
        };
        let slug = slugify(&root.title);
        let ctx = TraversalContext::new().with_visited(root.id.clone());

        let mut state = MapState::default();
        let node = self
            .visit(root, output_dir.to_path_buf(), slug, ctx, &mut state)
            .await?;

        Ok(SiteMap {
            root: node,
            failures: state.failures,
            hashes: state.hashes,
            files_written: state.files_written,
        })
    }

    fn visit<'s>(
        &'s self,
        page: PageRef,
        dir: PathBuf,
        slug: String,
        ctx: TraversalContext,
        state: &'s mut MapState,
    ) -> BoxFuture<'s, Result<PageNode, AppError>> {
        async move {
            let fetched = self
                .fetcher
                .fetch_children(&page.id, self.options.block_depth)
                .await?;
            if fetched.degraded {
                log::warn!(
                    "'{}' is incomplete: some content could not be fetched",
                    page.title
                );
            }
            for failure in &fetched.failures {
                state.failures.push(PageFailure {
                    title: page.title.clone(),
                    id: failure.id.clone(),
                    error: failure.error.clone(),
                });
            }

            let children = self.plan_children(&fetched.blocks, &dir, &ctx);
            let (document, body) = self.render_page(&page, &ctx, &fetched.blocks, &children)?;

            let path = index_path(&dir);
            let digest = content_digest(&document);
            let decision = self.detector.decide(&path, &document)?;
            self.commit(&path, &document, &digest, decision, state)?;

            let mut nodes = Vec::with_capacity(children.len());
            for child in children {
                let child_ctx = ctx
                    .descend(&child.page.title)
                    .with_visited(child.page.id.clone());
                let category = child_ctx.category.clone();
                let visit = self.visit(
                    child.page.clone(),
                    child.dir.clone(),
                    child.slug.clone(),
                    child_ctx,
                    &mut *state,
                );
                match visit.await {
                    Ok(node) => nodes.push(node),
                    Err(e) if e.is_remote() => {
                        log::error!(
                            "Failed to sync '{}' ({}): {}",
                            child.page.title,
                            child.page.id,
                            e
                        );
                        self.keep_previous_hashes(&child.dir, state);
                        state.failures.push(PageFailure {
                            title: child.page.title.clone(),
                            id: child.page.id.clone(),
                            error: e.to_string(),
                        });
                        nodes.push(PageNode::failed(child.page, child.slug, child.dir, category));
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok(PageNode {
                id: page.id,
                title: page.title,
                slug,
                dir,
                category: ctx.category,
                children: nodes,
                body,
                digest,
                decision: Some(decision),
                degraded: fetched.degraded,
            })
        }
        .boxed()
    }

    /// Picks the child pages to visit and the slug each one is written under.
    fn plan_children(&self, blocks: &[Block], dir: &Path, ctx: &TraversalContext) -> Vec<ChildPlan> {
        let mut taken = HashSet::new();
        let mut plans = Vec::new();

        for block in blocks {
            let Block::ChildPage(child) = block else {
                continue;
            };
            if child.common.archived {
                continue;
            }
            let title = child.title.trim();
            if self.is_skipped(title) {
                log::info!("Skipping '{}' by configuration", title);
                continue;
            }
            if ctx.has_visited(&child.common.id) {
                log::warn!("'{}' ({}) was already visited", title, child.common.id);
                continue;
            }
            if !ctx.should_visit(&child.common.id) {
                log::warn!("'{}' is nested too deeply and was not synced", title);
                continue;
            }

            let mut slug = slugify(title);
            if !taken.insert(slug.clone()) {
                let unique = format!("{}-{}", slug, child.common.id.short());
                log::warn!(
                    "'{}' has the same slug as an earlier sibling; writing it to '{}'",
                    title,
                    unique
                );
                taken.insert(unique.clone());
                slug = unique;
            }

            plans.push(ChildPlan {
                page: PageRef {
                    id: child.common.id.clone(),
                    title: title.to_string(),
                    last_edited: child.last_edited,
                },
                dir: dir.join(&slug),
                slug,
            });
        }

        plans
    }

    fn is_skipped(&self, title: &str) -> bool {
        self.options.skip_titles.iter().any(|skip| skip.trim() == title)
    }

    /// Renders the full document and the bare body for a page.
    fn render_page(
        &self,
        page: &PageRef,
        ctx: &TraversalContext,
        blocks: &[Block],
        children: &[ChildPlan],
    ) -> Result<(String, String), AppError> {
        let slugs: HashMap<NotionId, String> = children
            .iter()
            .map(|c| (c.page.id.clone(), c.slug.clone()))
            .collect();

        // Links to skipped or unvisited pages would dangle.
        let body_blocks: Vec<Block> = blocks
            .iter()
            .filter(|block| match block {
                Block::ChildPage(child) => slugs.contains_key(&child.common.id),
                _ => true,
            })
            .cloned()
            .collect();

        let render_ctx = RenderContext {
            child_pages: self.options.child_pages,
            slugs: Some(&slugs),
        };
        let body = render_blocks(&body_blocks, &render_ctx);

        let contents: Vec<ContentsLink> = match self.options.child_pages {
            ChildPagePolicy::Omit => children
                .iter()
                .map(|c| ContentsLink {
                    title: c.page.title.clone(),
                    slug: c.slug.clone(),
                })
                .collect(),
            ChildPagePolicy::Link => Vec::new(),
        };

        let front_matter = FrontMatter::new(&page.title, ctx.category.as_deref(), page.last_edited);
        let document = assemble_document(&front_matter, &contents, &body)?;
        Ok((document, body))
    }

    fn commit(
        &self,
        path: &Path,
        document: &str,
        digest: &str,
        decision: ChangeDecision,
        state: &mut MapState,
    ) -> Result<(), AppError> {
        let key = self.detector.key_for(path);
        match decision {
            ChangeDecision::Updated => {
                if self.options.dry_run {
                    log::info!("Would update {}", key);
                } else {
                    write_atomic(path, document)?;
                    state.files_written += 1;
                    log::info!("Updated {}", key);
                }
                state.hashes.record(key, digest);
            }
            ChangeDecision::Unchanged => {
                log::debug!("Unchanged {}", key);
                state.hashes.record(key, digest);
            }
            ChangeDecision::Skipped => {
                log::warn!("Keeping local edits to {}", key);
                if let Some(previous) = self.detector.recorded_digest(path) {
                    state.hashes.record(key, previous);
                }
            }
        }
        Ok(())
    }

    /// Carries the old index entries of a subtree that could not be synced.
    fn keep_previous_hashes(&self, dir: &Path, state: &mut MapState) {
        let prefix = format!("{}/", self.detector.key_for(dir));
        for (key, digest) in self.detector.previous().iter() {
            if key.starts_with(&prefix) {
                state.hashes.record(key, digest);
            }
        }
    }
}
