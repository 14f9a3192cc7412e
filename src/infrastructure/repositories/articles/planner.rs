// src/infrastructure/repositories/articles/planner.rs
//! Builds the "placed version" sub-selection for each stage: a ranked pick
//! over live versions, partitioned by article, keeping rank 1.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::domain::article::{Stage, VersionSelector};
use crate::domain::signature::{SignatureLevelId, SignatureResult};

/// Version columns exposed by every placed-version sub-selection.
pub(crate) const VERSION_COLUMNS: &str = "article_id, version, tags, submitted_at, submitted_by, \
    released_at, released_by, created_at, created_by, deleted_at";

pub(crate) struct PlacedVersions<'a> {
    selector: VersionSelector,
    now: DateTime<Utc>,
    scope: &'a [i64],
}

impl<'a> PlacedVersions<'a> {
    /// `scope` limits the articles considered; empty means all of them.
    pub(crate) fn new(selector: VersionSelector, now: DateTime<Utc>, scope: &'a [i64]) -> Self {
        Self {
            selector,
            now,
            scope,
        }
    }

    /// Pushes `( ... )` selecting `VERSION_COLUMNS` with at most one row per
    /// article.
    pub(crate) fn push(&self, builder: &mut QueryBuilder<'a, Postgres>) {
        match self.selector {
            VersionSelector::Exact(version) => {
                builder.push("(SELECT v.");
                builder.push(VERSION_COLUMNS.replace(", ", ", v."));
                builder.push(" FROM article_versions v WHERE v.deleted_at IS NULL AND v.version = ");
                builder.push_bind(i32::from(version));
                self.push_scope(builder);
                builder.push(")");
            }
            VersionSelector::Stage { stage, level } => {
                builder.push("(SELECT ");
                builder.push(VERSION_COLUMNS);
                builder.push(" FROM (SELECT v.");
                builder.push(VERSION_COLUMNS.replace(", ", ", v."));
                builder.push(", RANK() OVER (PARTITION BY v.article_id ORDER BY ");
                builder.push(order_of(stage));
                builder.push(") AS stage_rank FROM article_versions v");
                self.push_stage_filter(builder, stage, level);
                self.push_scope(builder);
                builder.push(") ranked WHERE ranked.stage_rank = 1)");
            }
        }
    }

    fn push_scope(&self, builder: &mut QueryBuilder<'a, Postgres>) {
        if !self.scope.is_empty() {
            builder.push(" AND v.article_id = ANY(");
            builder.push_bind(self.scope);
            builder.push(")");
        }
    }

    fn push_stage_filter(
        &self,
        builder: &mut QueryBuilder<'a, Postgres>,
        stage: Stage,
        level: Option<SignatureLevelId>,
    ) {
        match stage {
            Stage::Draft => {
                builder.push(
                    " WHERE v.deleted_at IS NULL AND v.submitted_at IS NULL AND v.released_at IS NULL",
                );
            }
            Stage::Reviewing => {
                if let Some(level) = level {
                    push_approval_join(builder, "LEFT JOIN", level);
                    builder.push(
                        " WHERE v.deleted_at IS NULL AND v.released_at IS NULL \
                         AND v.submitted_at IS NOT NULL AND s.id IS NULL",
                    );
                } else {
                    builder.push(
                        " WHERE v.deleted_at IS NULL AND v.released_at IS NULL \
                         AND v.submitted_at IS NOT NULL",
                    );
                }
            }
            Stage::Verified => match level {
                Some(level) => {
                    push_approval_join(builder, "JOIN", level);
                    builder.push(" WHERE v.deleted_at IS NULL AND v.released_at IS NULL");
                }
                None => {
                    builder.push(" WHERE FALSE");
                }
            },
            Stage::Scheduled => {
                builder.push(" WHERE v.deleted_at IS NULL AND v.released_at > ");
                builder.push_bind(self.now);
            }
            Stage::Released => {
                builder.push(" WHERE v.deleted_at IS NULL AND v.released_at <= ");
                builder.push_bind(self.now);
            }
        }
    }
}

fn push_approval_join<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    join: &'static str,
    level: SignatureLevelId,
) {
    builder.push(" ");
    builder.push(join);
    builder.push(
        " signatures s ON s.article_id = v.article_id AND s.version = v.version \
         AND s.deleted_at IS NULL AND s.result = ",
    );
    builder.push_bind(SignatureResult::Approved.as_str());
    builder.push(" AND s.signature_level_id = ");
    builder.push_bind(i64::from(level));
}

fn order_of(stage: Stage) -> &'static str {
    match stage {
        Stage::Draft => "v.created_at DESC, v.version DESC",
        Stage::Reviewing => "v.submitted_at DESC, v.version DESC",
        Stage::Verified => "s.signed_at DESC, v.version DESC",
        Stage::Scheduled => "v.released_at ASC, v.version DESC",
        Stage::Released => "v.released_at DESC, v.version DESC",
    }
}
