//! Order number allocation.

use jiff::{Timestamp, tz::TimeZone};
use milkrun::order_numbers::OrderNumber;

use crate::{
    sequences::{ORDER_NUMBER_SEQUENCE, SequenceRepository},
    store::StoreError,
};

/// Allocate the next order number, dated with the UTC day of `now`.
pub(crate) async fn allocate_order_number<S>(
    sequences: &S,
    now: Timestamp,
) -> Result<OrderNumber, StoreError>
where
    S: SequenceRepository + ?Sized,
{
    let sequence = sequences.next_value(ORDER_NUMBER_SEQUENCE).await?;

    Ok(OrderNumber::from_sequence(
        sequence,
        now.to_zoned(TimeZone::UTC).date(),
    ))
}
