//! Line-oriented command codec.
//!
//! Input grammar (one command per line, comma-separated fields):
//!
//! - New order:
//!   `N,<id>,<timestamp>,<symbol>,<type M|L|I>,<side B|S>,<price>,<qty>`
//!
//! - Amend:
//!   `A,<id>,<timestamp>,<symbol>,<type>,<side>,<price>,<qty>`
//!
//! - Cancel:
//!   `X,<id>,<timestamp>`
//!
//! - Match:
//!   `M,<timestamp>` or `M,<timestamp>,<symbol>`
//!
//! - Query:
//!   `Q` | `Q,<symbol>` | `Q,<timestamp>` | `Q,<symbol>,<timestamp>`
//!   | `Q,<timestamp>,<symbol>`
//!
//! The leading character of a query operand disambiguates symbol
//! (alphabetic) from timestamp (numeric). Prices render with exactly
//! two fractional digits in reports.

use matchbook_core::{
    AmendOrder, CancelOrder, Command, Event, MatchOrders, NewOrder, OrderId, OrderType, Price,
    QueryBooks, RejectReason, Side, Symbol, Timestamp,
};
use thiserror::Error;

/// A command line the parser refused.
///
/// Each variant carries whatever order id could be recovered so the
/// driver can render the matching reject line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Structurally malformed command; renders as a 303 reject.
    #[error("invalid order details")]
    InvalidCommand { id: OrderId },

    /// An amendment that would corrupt the book (zero quantity);
    /// renders as a 101 amend reject.
    #[error("invalid amendment details")]
    InvalidAmendment { id: OrderId },
}

impl ParseError {
    /// The reject event the report writer should render.
    pub fn rejection(&self) -> Event {
        match *self {
            ParseError::InvalidCommand { id } => {
                Event::reject(id, RejectReason::InvalidOrderDetails)
            }
            ParseError::InvalidAmendment { id } => {
                Event::amend_reject(id, RejectReason::InvalidAmendmentDetails)
            }
        }
    }

    /// Whether the driver should stop consuming the stream. Malformed
    /// framing poisons everything after it; a rejected amendment does
    /// not.
    pub fn halts_stream(&self) -> bool {
        matches!(self, ParseError::InvalidCommand { .. })
    }
}

/// Parse a single trimmed line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let tokens: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    match tokens[0] {
        "N" => parse_order(&tokens, false),
        "A" => parse_order(&tokens, true),
        "X" => parse_cancel(&tokens),
        "M" => parse_match(&tokens),
        "Q" => parse_query(&tokens),
        _ => Err(ParseError::InvalidCommand { id: 0 }),
    }
}

fn parse_order(tokens: &[&str], amend: bool) -> Result<Command, ParseError> {
    // Recover the id first so even a malformed tail rejects by id.
    let id: OrderId = tokens
        .get(1)
        .and_then(|t| t.parse().ok())
        .ok_or(ParseError::InvalidCommand { id: 0 })?;
    let invalid = ParseError::InvalidCommand { id };

    if tokens.len() != 8 {
        return Err(invalid);
    }
    let timestamp: Timestamp = tokens[2].parse().map_err(|_| invalid.clone())?;
    let symbol: Symbol = tokens[3].parse().map_err(|_| invalid.clone())?;
    let order_type = single_char(tokens[4])
        .and_then(OrderType::from_tag)
        .ok_or_else(|| invalid.clone())?;
    let side = single_char(tokens[5])
        .and_then(Side::from_char)
        .ok_or_else(|| invalid.clone())?;
    let price: Price = tokens[6].parse().map_err(|_| invalid.clone())?;
    let quantity: u64 = tokens[7].parse().map_err(|_| invalid.clone())?;

    if quantity == 0 {
        return Err(if amend {
            ParseError::InvalidAmendment { id }
        } else {
            invalid
        });
    }

    Ok(if amend {
        Command::Amend(AmendOrder {
            id,
            timestamp,
            symbol,
            order_type,
            side,
            price,
            quantity,
        })
    } else {
        Command::New(NewOrder {
            id,
            timestamp,
            symbol,
            order_type,
            side,
            price,
            quantity,
        })
    })
}

fn parse_cancel(tokens: &[&str]) -> Result<Command, ParseError> {
    let id: OrderId = tokens
        .get(1)
        .and_then(|t| t.parse().ok())
        .ok_or(ParseError::InvalidCommand { id: 0 })?;
    if tokens.len() != 3 {
        return Err(ParseError::InvalidCommand { id });
    }
    let timestamp: Timestamp = tokens[2]
        .parse()
        .map_err(|_| ParseError::InvalidCommand { id })?;
    Ok(Command::Cancel(CancelOrder { id, timestamp }))
}

fn parse_match(tokens: &[&str]) -> Result<Command, ParseError> {
    let invalid = ParseError::InvalidCommand { id: 0 };
    if !(2..=3).contains(&tokens.len()) {
        return Err(invalid);
    }
    let timestamp: Timestamp = tokens[1].parse().map_err(|_| invalid.clone())?;
    let symbol = match tokens.get(2) {
        Some(t) => Some(t.parse::<Symbol>().map_err(|_| invalid.clone())?),
        None => None,
    };
    Ok(Command::Match(MatchOrders { timestamp, symbol }))
}

fn parse_query(tokens: &[&str]) -> Result<Command, ParseError> {
    let invalid = ParseError::InvalidCommand { id: 0 };
    let mut symbol: Option<Symbol> = None;
    let mut timestamp: Option<Timestamp> = None;
    if tokens.len() > 3 {
        return Err(invalid);
    }
    for token in &tokens[1..] {
        if token.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            if symbol.is_some() {
                return Err(invalid);
            }
            symbol = Some(token.parse().map_err(|_| invalid.clone())?);
        } else {
            if timestamp.is_some() {
                return Err(invalid);
            }
            timestamp = Some(token.parse().map_err(|_| invalid.clone())?);
        }
    }
    Ok(Command::Query(QueryBooks { symbol, timestamp }))
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Render one engine event as one report line.
pub fn format_event(event: &Event) -> String {
    match event {
        Event::Accept { id } => format!("{id} - Accept"),
        Event::Reject { id, reason } => {
            format!("{id} - Reject - {} - {reason}", reason.code())
        }
        Event::AmendAccept { id } => format!("{id} - AmmendAccept"),
        Event::AmendReject { id, reason } => {
            format!("{id} - AmmendReject - {} - {reason}", reason.code())
        }
        Event::CancelAccept { id } => format!("{id} - CancelAccept"),
        Event::CancelReject { id, reason } => {
            format!("{id} - CancelReject - {} - {reason}", reason.code())
        }
        Event::Trade(t) => format!(
            "{}|{},{},{},{}|{},{},{},{}",
            t.symbol,
            t.buy_id,
            t.buy_type,
            t.buy_quantity,
            t.buy_price,
            t.sell_price,
            t.sell_quantity,
            t.sell_type,
            t.sell_id
        ),
        Event::SnapshotRow(row) => {
            let buy = row
                .buy
                .as_ref()
                .map(|b| format!("{},{},{},{}", b.id, b.order_type, b.quantity, b.price))
                .unwrap_or_default();
            let sell = row
                .sell
                .as_ref()
                .map(|s| format!("{},{},{},{}", s.price, s.quantity, s.order_type, s.id))
                .unwrap_or_default();
            format!("{}|{}|{}", row.symbol, buy, sell)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    #[test]
    fn parses_new_order() {
        let cmd = parse_command("N,1,0000001,AB,L,B,104.53,100").unwrap();
        assert_eq!(
            cmd,
            Command::New(NewOrder {
                id: 1,
                timestamp: 1,
                symbol: sym("AB"),
                order_type: OrderType::Limit,
                side: Side::Buy,
                price: Price::from_hundredths(10453),
                quantity: 100,
            })
        );
    }

    #[test]
    fn parses_amend_and_cancel() {
        let amend = parse_command("A,2,0000006,AB,L,S,104.42,100").unwrap();
        assert!(matches!(amend, Command::Amend(AmendOrder { id: 2, .. })));
        let cancel = parse_command("X,3,0000010").unwrap();
        assert_eq!(
            cancel,
            Command::Cancel(CancelOrder {
                id: 3,
                timestamp: 10
            })
        );
    }

    #[test]
    fn parses_match_forms() {
        assert_eq!(
            parse_command("M,4").unwrap(),
            Command::Match(MatchOrders {
                timestamp: 4,
                symbol: None
            })
        );
        assert_eq!(
            parse_command("M,4,AB").unwrap(),
            Command::Match(MatchOrders {
                timestamp: 4,
                symbol: Some(sym("AB"))
            })
        );
    }

    #[test]
    fn parses_all_query_forms() {
        assert_eq!(
            parse_command("Q").unwrap(),
            Command::Query(QueryBooks {
                symbol: None,
                timestamp: None
            })
        );
        assert_eq!(
            parse_command("Q,ALB").unwrap(),
            Command::Query(QueryBooks {
                symbol: Some(sym("ALB")),
                timestamp: None
            })
        );
        assert_eq!(
            parse_command("Q,0000003").unwrap(),
            Command::Query(QueryBooks {
                symbol: None,
                timestamp: Some(3)
            })
        );
        assert_eq!(
            parse_command("Q,ALN,0000002").unwrap(),
            Command::Query(QueryBooks {
                symbol: Some(sym("ALN")),
                timestamp: Some(2)
            })
        );
        assert_eq!(
            parse_command("Q,0000002,ALN").unwrap(),
            Command::Query(QueryBooks {
                symbol: Some(sym("ALN")),
                timestamp: Some(2)
            })
        );
    }

    #[test]
    fn malformed_lines_carry_the_recovered_id() {
        assert_eq!(
            parse_command("N,7,oops,AB,L,B,1.00,5"),
            Err(ParseError::InvalidCommand { id: 7 })
        );
        assert_eq!(
            parse_command("N,1,2,toolong,L,B,1.00,5"),
            Err(ParseError::InvalidCommand { id: 1 })
        );
        assert_eq!(
            parse_command("Z,1,2"),
            Err(ParseError::InvalidCommand { id: 0 })
        );
    }

    #[test]
    fn zero_quantities_reject_by_action() {
        assert_eq!(
            parse_command("N,5,2,AB,L,B,1.00,0"),
            Err(ParseError::InvalidCommand { id: 5 })
        );
        let err = parse_command("A,5,2,AB,L,B,1.00,0").unwrap_err();
        assert_eq!(err, ParseError::InvalidAmendment { id: 5 });
        assert!(!err.halts_stream());
    }

    #[test]
    fn formats_accept_and_reject_lines() {
        assert_eq!(format_event(&Event::accept(1)), "1 - Accept");
        assert_eq!(
            format_event(&Event::reject(2, RejectReason::InvalidOrderDetails)),
            "2 - Reject - 303 - Invalid order details"
        );
        assert_eq!(format_event(&Event::amend_accept(2)), "2 - AmmendAccept");
        assert_eq!(
            format_event(&Event::cancel_reject(999, RejectReason::OrderDoesNotExist)),
            "999 - CancelReject - 404 - Order does not exist"
        );
    }

    #[test]
    fn formats_trade_and_snapshot_rows() {
        use matchbook_core::{SnapshotEntry, SnapshotRow, Trade};
        let trade = Trade {
            symbol: sym("AB"),
            buy_id: 1,
            buy_type: OrderType::Limit,
            buy_quantity: 100,
            buy_price: Price::from_hundredths(10453),
            sell_price: Price::from_hundredths(10442),
            sell_quantity: 100,
            sell_type: OrderType::Limit,
            sell_id: 2,
        };
        assert_eq!(
            format_event(&Event::Trade(trade)),
            "AB|1,L,100,104.53|104.42,100,L,2"
        );

        let row = SnapshotRow {
            symbol: sym("AB"),
            buy: None,
            sell: Some(SnapshotEntry {
                id: 5,
                order_type: OrderType::Limit,
                quantity: 120,
                price: Price::from_hundredths(10553),
            }),
        };
        assert_eq!(format_event(&Event::SnapshotRow(row)), "AB||105.53,120,L,5");
    }
}
