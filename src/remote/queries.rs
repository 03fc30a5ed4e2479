//! GraphQL documents sent to the board service.

pub const BOARDS: &str = r#"
query Boards {
  boards(order_by: { created_at: desc }) {
    id
    name
    description
    created_at
    updated_at
    user_id
  }
}
"#;

pub const BOARDS_WITH_CARD_COUNTS: &str = r#"
query BoardsWithCardCounts {
  boards(order_by: { created_at: desc }) {
    id
    name
    description
    created_at
    updated_at
    user_id
    cards_aggregate {
      aggregate {
        count
      }
    }
  }
}
"#;

pub const CREATE_BOARD: &str = r#"
mutation CreateBoard($name: String!, $description: String) {
  insert_boards_one(object: { name: $name, description: $description }) {
    id
    name
    description
    created_at
    updated_at
    user_id
  }
}
"#;

pub const DELETE_BOARD_CARDS: &str = r#"
mutation DeleteBoardCards($boardId: uuid!) {
  delete_cards(where: { board_id: { _eq: $boardId } }) {
    affected_rows
  }
}
"#;

pub const DELETE_BOARD: &str = r#"
mutation DeleteBoard($boardId: uuid!) {
  delete_boards_by_pk(id: $boardId) {
    id
  }
}
"#;

pub const GET_BOARD: &str = r#"
query GetBoard($boardId: uuid!) {
  boards_by_pk(id: $boardId) {
    id
    name
    description
    created_at
    updated_at
    user_id
  }
}
"#;

pub const GET_BOARD_CARDS: &str = r#"
query GetBoardCards($boardId: uuid!) {
  cards(where: { board_id: { _eq: $boardId } }, order_by: { position: asc }) {
    id
    title
    description
    status
    position
    created_at
    board_id
  }
}
"#;

pub const INSERT_CARD: &str = r#"
mutation AddCard($title: String!, $description: String, $status: String!, $position: Float!, $board_id: uuid!) {
  insert_cards_one(object: {
    title: $title,
    description: $description,
    status: $status,
    position: $position,
    board_id: $board_id
  }) {
    id
    title
    description
    status
    position
    created_at
    board_id
  }
}
"#;

pub const UPDATE_CARD_POSITION: &str = r#"
mutation UpdateCardPosition($cardId: uuid!, $position: Float!) {
  update_cards_by_pk(pk_columns: { id: $cardId }, _set: { position: $position }) {
    id
    position
  }
}
"#;

pub const UPDATE_CARD_STATUS_AND_POSITION: &str = r#"
mutation UpdateCard($cardId: uuid!, $status: String!, $position: Float!) {
  update_cards_by_pk(pk_columns: { id: $cardId }, _set: { status: $status, position: $position }) {
    id
    status
    position
  }
}
"#;

pub const DELETE_CARD: &str = r#"
mutation DeleteCard($cardId: uuid!) {
  delete_cards_by_pk(id: $cardId) {
    id
  }
}
"#;
