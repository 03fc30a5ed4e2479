use crate::{
    auth::AuthProvider,
    config::ClientConfig,
    domain::{Board, BoardId, Card, CardId, CardStatus, NewBoard, NewCard},
    error::{KanbanError, Result},
    remote::{error::RemoteError, queries, Remote},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Outcome of one GraphQL request.
///
/// A response may carry both: the service can return partial data next to
/// an error list.
#[derive(Debug)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub error: Option<RemoteError>,
}

impl<T> GraphqlResponse<T> {
    fn failed(error: RemoteError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Data when the request fully succeeded, otherwise the error
    pub fn into_result(self) -> std::result::Result<T, RemoteError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(RemoteError::Decode(
                "response carried neither data nor errors".to_string(),
            )),
        }
    }
}

/// Posts GraphQL documents to the board service with the session's token
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    auth: Arc<dyn AuthProvider>,
}

impl GraphqlClient {
    pub fn new(config: &ClientConfig, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| KanbanError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http(http, config.graphql_endpoint(), auth))
    }

    pub fn with_http(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            auth,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Executes `query` with `variables`. Never fails outright; transport and
    /// service errors land in [`GraphqlResponse::error`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> GraphqlResponse<T> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = self.auth.access_token().await {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return GraphqlResponse::failed(e.into()),
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return GraphqlResponse::failed(e.into()),
        };

        let parsed = serde_json::from_str::<Value>(&body);
        let raw = match parsed {
            Ok(raw) => raw,
            Err(_) if !status.is_success() => {
                return GraphqlResponse::failed(RemoteError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return GraphqlResponse::failed(RemoteError::Decode(e.to_string())),
        };

        let mut error = raw
            .get("errors")
            .filter(|errors| !errors.is_null())
            .map(RemoteError::from_payload);
        if error.is_none() && !status.is_success() {
            error = Some(RemoteError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let data = match raw.get("data").filter(|d| !d.is_null()) {
            Some(data) => match serde_json::from_value::<T>(data.clone()) {
                Ok(data) => Some(data),
                Err(e) => {
                    error.get_or_insert(RemoteError::Decode(e.to_string()));
                    None
                }
            },
            None => None,
        };

        GraphqlResponse { data, error }
    }

    /// Like [`request`](Self::request) but fails on any error. Rejected
    /// credentials surface as `AuthenticationRequired`.
    async fn run<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        match self.request(query, variables).await.into_result() {
            Ok(data) => Ok(data),
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("board service rejected credentials: {}", e);
                Err(KanbanError::AuthenticationRequired)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireBoard {
    id: BoardId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    cards_aggregate: Option<WireAggregate>,
}

#[derive(Debug, Deserialize)]
struct WireAggregate {
    aggregate: Option<WireCount>,
}

#[derive(Debug, Deserialize)]
struct WireCount {
    count: u64,
}

impl From<WireBoard> for Board {
    fn from(wire: WireBoard) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            description: wire.description,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            user_id: wire.user_id,
            card_count: wire
                .cards_aggregate
                .and_then(|a| a.aggregate)
                .map(|a| a.count),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCard {
    id: CardId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    status: String,
    position: f64,
    created_at: DateTime<Utc>,
    board_id: BoardId,
}

impl TryFrom<WireCard> for Card {
    type Error = KanbanError;

    fn try_from(wire: WireCard) -> Result<Self> {
        Ok(Self {
            status: wire.status.parse::<CardStatus>()?,
            id: wire.id,
            title: wire.title,
            description: wire.description,
            position: wire.position,
            created_at: wire.created_at,
            board_id: wire.board_id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct BoardsData {
    boards: Vec<WireBoard>,
}

#[derive(Debug, Deserialize)]
struct CreateBoardData {
    insert_boards_one: WireBoard,
}

#[derive(Debug, Deserialize)]
struct AffectedRows {
    affected_rows: u64,
}

#[derive(Debug, Deserialize)]
struct DeleteBoardCardsData {
    delete_cards: AffectedRows,
}

#[derive(Debug, Deserialize)]
struct DeleteBoardData {
    delete_boards_by_pk: Option<IdOnly>,
}

#[derive(Debug, Deserialize)]
struct BoardByPkData {
    boards_by_pk: Option<WireBoard>,
}

#[derive(Debug, Deserialize)]
struct CardsData {
    cards: Vec<WireCard>,
}

#[derive(Debug, Deserialize)]
struct InsertCardData {
    insert_cards_one: WireCard,
}

#[derive(Debug, Deserialize)]
struct UpdateCardData {
    update_cards_by_pk: Option<IdOnly>,
}

#[derive(Debug, Deserialize)]
struct DeleteCardData {
    delete_cards_by_pk: Option<IdOnly>,
}

/// [`Remote`] backed by the hosted GraphQL service
pub struct GraphqlRemote {
    client: GraphqlClient,
}

impl GraphqlRemote {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GraphqlClient {
        &self.client
    }
}

#[async_trait]
impl Remote for GraphqlRemote {
    async fn fetch_boards(&self, with_card_counts: bool) -> Result<Vec<Board>> {
        let query = if with_card_counts {
            queries::BOARDS_WITH_CARD_COUNTS
        } else {
            queries::BOARDS
        };
        let data: BoardsData = self.client.run(query, json!({})).await?;
        Ok(data.boards.into_iter().map(Board::from).collect())
    }

    async fn create_board(&self, board: &NewBoard) -> Result<Board> {
        let data: CreateBoardData = self
            .client
            .run(
                queries::CREATE_BOARD,
                json!({ "name": board.name, "description": board.description }),
            )
            .await?;
        Ok(data.insert_boards_one.into())
    }

    async fn delete_board_cards(&self, board_id: &BoardId) -> Result<u64> {
        let data: DeleteBoardCardsData = self
            .client
            .run(queries::DELETE_BOARD_CARDS, json!({ "boardId": board_id }))
            .await?;
        Ok(data.delete_cards.affected_rows)
    }

    async fn delete_board(&self, board_id: &BoardId) -> Result<()> {
        let data: DeleteBoardData = self
            .client
            .run(queries::DELETE_BOARD, json!({ "boardId": board_id }))
            .await?;
        data.delete_boards_by_pk
            .map(|_| ())
            .ok_or_else(|| KanbanError::BoardNotFound(board_id.to_string()))
    }

    async fn fetch_board(&self, board_id: &BoardId) -> Result<Board> {
        let data: BoardByPkData = self
            .client
            .run(queries::GET_BOARD, json!({ "boardId": board_id }))
            .await?;
        data.boards_by_pk
            .map(Board::from)
            .ok_or_else(|| KanbanError::BoardNotFound(board_id.to_string()))
    }

    async fn fetch_board_cards(&self, board_id: &BoardId) -> Result<Vec<Card>> {
        let data: CardsData = self
            .client
            .run(queries::GET_BOARD_CARDS, json!({ "boardId": board_id }))
            .await?;

        let mut cards = Vec::with_capacity(data.cards.len());
        for wire in data.cards {
            let card_id = wire.id.clone();
            match Card::try_from(wire) {
                Ok(card) => cards.push(card),
                Err(e) => tracing::warn!(card_id = card_id.as_str(), "skipping card: {}", e),
            }
        }
        Ok(cards)
    }

    async fn insert_card(&self, card: &NewCard) -> Result<Card> {
        let data: InsertCardData = self
            .client
            .run(
                queries::INSERT_CARD,
                json!({
                    "title": card.title,
                    "description": card.description,
                    "status": card.status.as_str(),
                    "position": card.position,
                    "board_id": card.board_id,
                }),
            )
            .await?;
        Card::try_from(data.insert_cards_one)
    }

    async fn update_card_position(&self, card_id: &CardId, position: f64) -> Result<()> {
        let data: UpdateCardData = self
            .client
            .run(
                queries::UPDATE_CARD_POSITION,
                json!({ "cardId": card_id, "position": position }),
            )
            .await?;
        data.update_cards_by_pk
            .map(|_| ())
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))
    }

    async fn update_card_status_and_position(
        &self,
        card_id: &CardId,
        status: CardStatus,
        position: f64,
    ) -> Result<()> {
        let data: UpdateCardData = self
            .client
            .run(
                queries::UPDATE_CARD_STATUS_AND_POSITION,
                json!({ "cardId": card_id, "status": status.as_str(), "position": position }),
            )
            .await?;
        data.update_cards_by_pk
            .map(|_| ())
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))
    }

    async fn delete_card(&self, card_id: &CardId) -> Result<()> {
        let data: DeleteCardData = self
            .client
            .run(queries::DELETE_CARD, json!({ "cardId": card_id }))
            .await?;
        data.delete_cards_by_pk
            .map(|_| ())
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Session, SessionAuth, User};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GRAPHQL_PATH: &str = "/v1/graphql";

    fn signed_in() -> Arc<dyn AuthProvider> {
        let user = User {
            id: "u-1".to_string(),
            email: None,
            display_name: None,
        };
        Arc::new(SessionAuth::signed_in(
            Session::new(user, "test-token"),
            "/signin",
        ))
    }

    fn remote_for(server: &MockServer, auth: Arc<dyn AuthProvider>) -> GraphqlRemote {
        let endpoint = format!("{}{}", server.uri(), GRAPHQL_PATH);
        GraphqlRemote::new(GraphqlClient::with_http(
            reqwest::Client::new(),
            endpoint,
            auth,
        ))
    }

    #[tokio::test]
    async fn test_request_sends_bearer_token_and_variables() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({ "variables": { "boardId": "b-1" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "boards_by_pk": {
                    "id": "b-1",
                    "name": "Roadmap",
                    "description": "Next quarter",
                    "created_at": "2024-05-01T10:00:00+00:00"
                } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let board = remote.fetch_board(&BoardId::from("b-1")).await.unwrap();

        assert_eq!(board.name, "Roadmap");
        assert_eq!(board.description.as_deref(), Some("Next quarter"));
        assert!(board.card_count.is_none());
    }

    #[tokio::test]
    async fn test_missing_board_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "boards_by_pk": null } })),
            )
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let err = remote.fetch_board(&BoardId::from("b-9")).await.unwrap_err();
        assert!(matches!(err, KanbanError::BoardNotFound(id) if id == "b-9"));
    }

    #[tokio::test]
    async fn test_board_list_reads_card_count_aggregate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "boards": [
                    {
                        "id": "b-2",
                        "name": "New",
                        "created_at": "2024-06-01T00:00:00Z",
                        "cards_aggregate": { "aggregate": { "count": 3 } }
                    },
                    {
                        "id": "b-1",
                        "name": "Old",
                        "created_at": "2024-01-01T00:00:00Z",
                        "cards_aggregate": { "aggregate": { "count": 0 } }
                    }
                ] }
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let boards = remote.fetch_boards(true).await.unwrap();

        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].card_count, Some(3));
        assert_eq!(boards[1].card_count, Some(0));
    }

    #[tokio::test]
    async fn test_graphql_errors_are_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{
                    "message": "Foreign key violation",
                    "extensions": { "code": "constraint-violation", "path": "$.selectionSet" }
                }]
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let card = NewCard::new("Task", CardStatus::Done, BoardId::from("b-1")).unwrap();
        let err = remote.insert_card(&card).await.unwrap_err();

        assert_eq!(
            err.user_message("add card"),
            "Failed to add card: constraint-violation: Foreign key violation"
        );
    }

    #[tokio::test]
    async fn test_http_failure_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let err = remote
            .update_card_position(&CardId::from("c-1"), 1000.0)
            .await
            .unwrap_err();

        match err {
            KanbanError::Remote(RemoteError::Http { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_token_requires_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{
                    "message": "Could not verify JWT: JWTExpired",
                    "extensions": { "code": "invalid-jwt", "path": "$" }
                }]
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let err = remote.fetch_boards(false).await.unwrap_err();
        assert!(matches!(err, KanbanError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn test_http_401_requires_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let err = remote
            .delete_card(&CardId::from("c-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, KanbanError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn test_fetch_cards_skips_unknown_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "cards": [
                    {
                        "id": "c-1", "title": "Keep", "description": null, "status": "done",
                        "position": 1000, "created_at": "2024-05-01T10:00:00Z", "board_id": "b-1"
                    },
                    {
                        "id": "c-2", "title": "Drop", "description": null, "status": "archived",
                        "position": 2000, "created_at": "2024-05-01T10:00:00Z", "board_id": "b-1"
                    }
                ] }
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let cards = remote
            .fetch_board_cards(&BoardId::from("b-1"))
            .await
            .unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id.as_str(), "c-1");
    }

    #[tokio::test]
    async fn test_update_status_and_position_sends_wire_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "variables": { "cardId": "c-1", "status": "working_on_it", "position": 1500.0 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "update_cards_by_pk": { "id": "c-1", "status": "working_on_it", "position": 1500 } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        remote
            .update_card_status_and_position(&CardId::from("c-1"), CardStatus::WorkingOnIt, 1500.0)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_card_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "delete_cards_by_pk": null }
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let err = remote.delete_card(&CardId::from("c-404")).await.unwrap_err();
        assert!(matches!(err, KanbanError::CardNotFound(_)));
    }

    #[tokio::test]
    async fn test_request_exposes_partial_data_and_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "boards": [] },
                "errors": ["slow query"]
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, signed_in());
        let response: GraphqlResponse<Value> =
            remote.client().request(queries::BOARDS, json!({})).await;

        assert!(response.data.is_some());
        assert_eq!(response.error.unwrap().to_string(), "slow query");
    }
}
