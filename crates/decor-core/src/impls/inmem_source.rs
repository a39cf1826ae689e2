//! InMemoryRecordSource - テスト・開発用の Record Source
//!
//! # 学習ポイント
//! - tokio::sync::Mutex で状態を保護（await を跨いでもロックを持たない）
//! - レコードごとに更新結果をスクリプトできる（レート制限 → 成功 など）
//! - 成功した更新はレコードに反映されるので、再実行で冪等性を確認できる

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    COVER_KIND, DatabaseId, Decoration, ICON_KIND, PropertyDescriptor, Record, RecordFilter,
    RecordId, RecordView, Schema, SourceError,
};
use crate::ports::RecordSource;

/// 呼び出し回数（テストでの検証用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub schema: usize,
    pub query: usize,
    pub update: usize,
}

#[derive(Default)]
struct State {
    schema: Schema,
    entries: Vec<RecordView>,
    /// record_id ごとの更新結果。空になったら成功扱い
    scripts: HashMap<RecordId, VecDeque<Result<(), SourceError>>>,
    schema_error: Option<SourceError>,
    query_error: Option<SourceError>,
    calls: CallCounts,
    attempts: HashMap<RecordId, u32>,
    applied: Vec<(RecordId, Decoration)>,
}

/// InMemoryRecordSource はメモリ上のレコード集合
///
/// # 使用例
/// ```ignore
/// let source = InMemoryRecordSource::with_page_schema()
///     .with_records([Record::new("a"), Record::new("b").with_icon("🚀")])
///     .script_updates("a", [Err(SourceError::rate_limited("slow down"))]);
/// ```
pub struct InMemoryRecordSource {
    state: Mutex<State>,
}

impl InMemoryRecordSource {
    pub fn new(schema: Schema) -> Self {
        Self {
            state: Mutex::new(State {
                schema,
                ..State::default()
            }),
        }
    }

    /// Notion のページと同じく `icon` / `cover` を持つスキーマ
    pub fn with_page_schema() -> Self {
        Self::new(page_schema())
    }

    pub fn with_record(mut self, view: impl Into<RecordView>) -> Self {
        self.state.get_mut().entries.push(view.into());
        self
    }

    pub fn with_records<I, R>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RecordView>,
    {
        self.state
            .get_mut()
            .entries
            .extend(records.into_iter().map(Into::into));
        self
    }

    pub fn with_partial(mut self, id: impl Into<RecordId>) -> Self {
        self.state
            .get_mut()
            .entries
            .push(RecordView::Partial { id: id.into() });
        self
    }

    /// `id` への更新呼び出しが順に返す結果
    pub fn script_updates<I>(mut self, id: impl Into<RecordId>, results: I) -> Self
    where
        I: IntoIterator<Item = Result<(), SourceError>>,
    {
        self.state
            .get_mut()
            .scripts
            .entry(id.into())
            .or_default()
            .extend(results);
        self
    }

    pub fn fail_schema(mut self, err: SourceError) -> Self {
        self.state.get_mut().schema_error = Some(err);
        self
    }

    pub fn fail_query(mut self, err: SourceError) -> Self {
        self.state.get_mut().query_error = Some(err);
        self
    }

    pub async fn calls(&self) -> CallCounts {
        self.state.lock().await.calls
    }

    /// `id` への更新呼び出し回数
    pub async fn attempts_for(&self, id: &RecordId) -> u32 {
        self.state
            .lock()
            .await
            .attempts
            .get(id)
            .copied()
            .unwrap_or(0)
    }

    /// 成功した更新（呼び出し順）
    pub async fn applied(&self) -> Vec<(RecordId, Decoration)> {
        self.state.lock().await.applied.clone()
    }

    pub async fn record(&self, id: &RecordId) -> Option<Record> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .filter_map(RecordView::as_full)
            .find(|r| &r.id == id)
            .cloned()
    }
}

fn page_schema() -> Schema {
    [
        PropertyDescriptor::new("Name", "title"),
        PropertyDescriptor::new("icon", ICON_KIND),
        PropertyDescriptor::new("cover", COVER_KIND),
    ]
    .into_iter()
    .collect()
}

/// フィルタの属性名がスキーマ上の icon / cover 属性を指しているか
fn resolve_filter_property(schema: &Schema, name: &str, kind: &str) -> Result<(), SourceError> {
    match schema.get(name) {
        Some(descriptor) if descriptor.kind == kind => Ok(()),
        _ => Err(SourceError::api(
            400,
            "validation_error",
            format!("Could not find {kind} property with name or id: {name}"),
        )),
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn retrieve_schema(&self, _database_id: &DatabaseId) -> Result<Schema, SourceError> {
        let mut state = self.state.lock().await;
        state.calls.schema += 1;
        if let Some(err) = &state.schema_error {
            return Err(err.clone());
        }
        Ok(state.schema.clone())
    }

    async fn query_records(
        &self,
        _database_id: &DatabaseId,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<RecordView>, SourceError> {
        let mut state = self.state.lock().await;
        state.calls.query += 1;
        if let Some(err) = &state.query_error {
            return Err(err.clone());
        }
        if let Some(RecordFilter::BothEmpty { icon, cover }) = filter {
            resolve_filter_property(&state.schema, icon, ICON_KIND)?;
            resolve_filter_property(&state.schema, cover, COVER_KIND)?;
        }
        let views = state
            .entries
            .iter()
            .filter(|view| match (filter, view) {
                (None, _) => true,
                // 部分的なエントリはサーバ側では判定できないのでそのまま返す
                (Some(_), RecordView::Partial { .. }) => true,
                (Some(RecordFilter::BothEmpty { .. }), RecordView::Full(record)) => {
                    record.is_undecorated()
                }
            })
            .cloned()
            .collect();
        Ok(views)
    }

    async fn update_record(
        &self,
        record_id: &RecordId,
        decoration: &Decoration,
    ) -> Result<(), SourceError> {
        let mut state = self.state.lock().await;
        state.calls.update += 1;
        *state.attempts.entry(record_id.clone()).or_insert(0) += 1;

        let scripted = state
            .scripts
            .get_mut(record_id)
            .and_then(VecDeque::pop_front);
        if let Some(Err(err)) = scripted {
            return Err(err);
        }

        let Some(record) = state.entries.iter_mut().find_map(|view| match view {
            RecordView::Full(record) if &record.id == record_id => Some(record),
            _ => None,
        }) else {
            return Err(SourceError::api(
                404,
                "object_not_found",
                format!("Could not find page with ID: {record_id}."),
            ));
        };
        record.icon = Some(decoration.icon.clone());
        record.cover = Some(decoration.cover_url());
        state.applied.push((record_id.clone(), decoration.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DecorationSpec, SolidColor};

    fn decoration() -> Decoration {
        Decoration::new(
            "🚀",
            DecorationSpec::Solid {
                color: SolidColor::Red,
            },
        )
    }

    #[tokio::test]
    async fn server_side_filter_drops_decorated_records() {
        let source = InMemoryRecordSource::with_page_schema()
            .with_records([Record::new("a"), Record::new("b").with_icon("🚀")])
            .with_partial("p");
        let filter = RecordFilter::BothEmpty {
            icon: "icon".into(),
            cover: "cover".into(),
        };

        let all = source
            .query_records(&DatabaseId::new("db"), None)
            .await
            .unwrap();
        let narrowed = source
            .query_records(&DatabaseId::new("db"), Some(&filter))
            .await
            .unwrap();

        assert_eq!(all.len(), 3);
        let ids: Vec<&str> = narrowed.iter().map(|v| v.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "p"]);
        assert_eq!(source.calls().await.query, 2);
    }

    #[tokio::test]
    async fn filter_names_must_resolve_to_decoration_attributes() {
        let source = InMemoryRecordSource::with_page_schema().with_record(Record::new("a"));
        let filter = RecordFilter::BothEmpty {
            icon: "Name".into(),
            cover: "cover".into(),
        };

        let err = source
            .query_records(&DatabaseId::new("db"), Some(&filter))
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn scripted_results_then_success_applies_decoration() {
        let id = RecordId::new("a");
        let source = InMemoryRecordSource::with_page_schema()
            .with_record(Record::new("a"))
            .script_updates("a", [Err(SourceError::rate_limited("slow down"))]);

        let first = source.update_record(&id, &decoration()).await;
        assert!(matches!(first, Err(SourceError::RateLimited { .. })));

        source.update_record(&id, &decoration()).await.unwrap();

        let record = source.record(&id).await.unwrap();
        assert_eq!(record.icon.as_deref(), Some("🚀"));
        assert_eq!(
            record.cover.as_deref(),
            Some("https://www.notion.so/images/page-cover/solid_red.png")
        );
        assert_eq!(source.attempts_for(&id).await, 2);
        assert_eq!(source.applied().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let source = InMemoryRecordSource::with_page_schema();
        let err = source
            .update_record(&RecordId::new("missing"), &decoration())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn schema_failure_is_reported() {
        let source = InMemoryRecordSource::with_page_schema()
            .fail_schema(SourceError::Transport("refused".into()));
        let err = source
            .retrieve_schema(&DatabaseId::new("db"))
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::Transport("refused".into()));
        assert_eq!(source.calls().await.schema, 1);
    }
}
