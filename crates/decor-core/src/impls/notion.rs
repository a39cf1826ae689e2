//! NotionRecordSource - Notion REST API 実装
//!
//! - `GET  /v1/databases/{id}`        → スキーマ
//! - `POST /v1/databases/{id}/query`  → ページ一覧（1 回だけ、ページングなし）
//! - `PATCH /v1/pages/{id}`           → icon + cover の更新
//!
//! レスポンスの解釈（ページ / エラー）は純粋関数に切り出してあり、
//! ネットワークなしでテストできます。

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};

use crate::domain::{
    COVER_KIND, DatabaseId, Decoration, ICON_KIND, PropertyDescriptor, Record, RecordFilter,
    RecordId, RecordView, Schema, SourceError,
};
use crate::ports::RecordSource;

pub const NOTION_API_BASE: &str = "https://api.notion.com";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion が返すレート制限のエラーコード
const RATE_LIMITED_CODE: &str = "rate_limited";

/// NotionRecordSource は Notion の integration token で API を呼ぶ
///
/// `reqwest::Client` は内部で接続プールを共有するので、並行する更新でも 1 つで足りる。
#[derive(Clone)]
pub struct NotionRecordSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NotionRecordSource {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: NOTION_API_BASE.to_string(),
            api_key: api_key.into(),
        }
    }

    /// 接続先を差し替える（プロキシ・スタブサーバ用）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, SourceError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(classify_error(status.as_u16(), &body))
        }
    }
}

impl std::fmt::Debug for NotionRecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionRecordSource")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl RecordSource for NotionRecordSource {
    async fn retrieve_schema(&self, database_id: &DatabaseId) -> Result<Schema, SourceError> {
        let body = self
            .send(self.client.get(self.url(&format!("databases/{database_id}"))))
            .await?;
        parse_schema(&body)
    }

    async fn query_records(
        &self,
        database_id: &DatabaseId,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<RecordView>, SourceError> {
        if let Some(notice) = unsupported_filter_notice(filter) {
            tracing::warn!(?filter, "{notice}");
        }
        let body = self
            .send(
                self.client
                    .post(self.url(&format!("databases/{database_id}/query")))
                    .json(&json!({})),
            )
            .await?;
        parse_query(&body)
    }

    async fn update_record(
        &self,
        record_id: &RecordId,
        decoration: &Decoration,
    ) -> Result<(), SourceError> {
        self.send(
            self.client
                .patch(self.url(&format!("pages/{record_id}")))
                .json(&update_body(decoration)),
        )
        .await?;
        Ok(())
    }
}

/// Notion のクエリ API にはページの icon / cover を条件にするフィルタがない。
/// フィルタを要求された場合は全件を取得し、絞り込みはクライアント側のパスに任せる。
pub fn unsupported_filter_notice(filter: Option<&RecordFilter>) -> Option<&'static str> {
    match filter {
        Some(RecordFilter::BothEmpty { .. }) => Some(
            "server-side filtering is not supported by the Notion query API; \
             fetching all pages and filtering client-side",
        ),
        None => None,
    }
}

/// 非 2xx のレスポンスを分類する
///
/// HTTP 429 またはボディの `code == "rate_limited"` はレート制限。
pub fn classify_error(status: u16, body: &str) -> SourceError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let code = field("code").unwrap_or_default();
    let message = field("message").unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.trim().to_string()
        }
    });

    if status == 429 || code == RATE_LIMITED_CODE {
        SourceError::rate_limited(message)
    } else {
        SourceError::api(status, code, message)
    }
}

/// データベースの `properties` と、全ページが持つ `icon` / `cover` をスキーマにする
pub fn parse_schema(body: &Value) -> Result<Schema, SourceError> {
    let properties = body
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::Decode("database has no properties object".to_string()))?;

    let mut schema: Schema = properties
        .iter()
        .map(|(name, descriptor)| {
            let kind = descriptor
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            PropertyDescriptor::new(name.clone(), kind)
        })
        .collect();
    schema.insert(PropertyDescriptor::new("icon", ICON_KIND));
    schema.insert(PropertyDescriptor::new("cover", COVER_KIND));
    Ok(schema)
}

pub fn parse_query(body: &Value) -> Result<Vec<RecordView>, SourceError> {
    body.get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Decode("query response has no results array".to_string()))?
        .iter()
        .map(parse_page)
        .collect()
}

/// `url` か `properties` を持てば完全なページ、`id` だけなら部分的な参照
pub fn parse_page(page: &Value) -> Result<RecordView, SourceError> {
    let id = page
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| SourceError::Decode("page without id".to_string()))?;
    let id = RecordId::new(id);

    let is_full = page.get("url").is_some() || page.get("properties").is_some();
    if !is_full {
        return Ok(RecordView::Partial { id });
    }

    Ok(RecordView::Full(Record {
        id,
        icon: page.get("icon").and_then(render_file_or_emoji),
        cover: page.get("cover").and_then(render_file_or_emoji),
    }))
}

/// icon / cover オブジェクトを短い文字列にする（`null` は未設定）
fn render_file_or_emoji(value: &Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    let kind = value.get("type").and_then(Value::as_str).unwrap_or("unknown");
    let rendered = match kind {
        "emoji" => value.get("emoji").and_then(Value::as_str).map(str::to_string),
        "external" | "file" => value
            .get(kind)
            .and_then(|inner| inner.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string),
        "custom_emoji" => value
            .get("custom_emoji")
            .and_then(|inner| inner.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    // 中身が読めなくても「何か設定されている」ことは確かなので種別名を返す
    Some(rendered.unwrap_or_else(|| kind.to_string()))
}

pub fn update_body(decoration: &Decoration) -> Value {
    json!({
        "icon": {
            "type": "emoji",
            "emoji": decoration.icon,
        },
        "cover": {
            "type": "external",
            "external": { "url": decoration.cover_url() },
        },
    })
}
