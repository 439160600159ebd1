//! Bookings held as rows of a Notion database.
//!
//! | Column               | Notion type  | Notes                              |
//! |----------------------|--------------|------------------------------------|
//! | Villa                | title        |                                    |
//! | Check In, Check Out  | date         |                                    |
//! | Customer Name        | rich_text    |                                    |
//! | Email                | email        |                                    |
//! | Phone                | phone_number | digits only                        |
//! | Guests               | number       |                                    |
//! | Extra Mattresses     | number       |                                    |
//! | Amount               | number       | major units, e.g. rupees           |
//! | Status               | select       | `Pending`, `Completed` or `Failed` |
//! | Razorpay Order ID    | rich_text    |                                    |
//! | Razorpay Payment ID  | rich_text    |                                    |
use log::*;
use notion_tools::{
    properties::{self, Properties},
    DatabaseQuery,
    NotionApi,
    NotionApiError,
    NotionConfig,
    Page,
};
use villa_pay_engine::{
    booking_types::{BookingHandle, BookingId, BookingRecord, BookingStatus, NewBooking, StatusUpdate},
    traits::{BookingStore, StoreError},
};
use vp_common::MinorUnits;

pub const VILLA: &str = "Villa";
pub const CHECK_IN: &str = "Check In";
pub const CHECK_OUT: &str = "Check Out";
pub const CUSTOMER_NAME: &str = "Customer Name";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Phone";
pub const GUESTS: &str = "Guests";
pub const EXTRA_MATTRESSES: &str = "Extra Mattresses";
pub const AMOUNT: &str = "Amount";
pub const STATUS: &str = "Status";
pub const ORDER_ID: &str = "Razorpay Order ID";
pub const PAYMENT_ID: &str = "Razorpay Payment ID";

/// [`BookingStore`] backed by a Notion database.
#[derive(Clone)]
pub struct NotionBookingStore {
    api: NotionApi,
}

impl NotionBookingStore {
    pub fn new(config: NotionConfig) -> Result<Self, NotionApiError> {
        let api = NotionApi::new(config)?;
        Ok(Self { api })
    }
}

fn store_error(e: NotionApiError) -> StoreError {
    match e {
        NotionApiError::QueryError { status, code, message } => StoreError::Remote { status, code, message },
        NotionApiError::RestRequestError(s) => StoreError::Transport(s),
        e => StoreError::Data(e.to_string()),
    }
}

pub fn booking_properties(booking: &NewBooking) -> Properties {
    let mut props = Properties::new();
    props.insert(VILLA.into(), properties::title(&booking.villa_name));
    props.insert(CHECK_IN.into(), properties::date(booking.check_in));
    props.insert(CHECK_OUT.into(), properties::date(booking.check_out));
    props.insert(CUSTOMER_NAME.into(), properties::rich_text(&booking.customer_name));
    props.insert(EMAIL.into(), properties::email(&booking.customer_email));
    props.insert(PHONE.into(), properties::phone_number(&booking.customer_phone));
    props.insert(GUESTS.into(), properties::number(booking.guests));
    props.insert(EXTRA_MATTRESSES.into(), properties::number(booking.extra_mattresses));
    props.insert(AMOUNT.into(), properties::number(booking.amount.as_major()));
    props.insert(STATUS.into(), properties::select(&BookingStatus::Pending.to_string()));
    props
}

/// Only the status and the ids that are present are written.
pub fn status_properties(update: &StatusUpdate) -> Properties {
    let mut props = Properties::new();
    props.insert(STATUS.into(), properties::select(&update.status.to_string()));
    if let Some(id) = &update.gateway_order_id {
        props.insert(ORDER_ID.into(), properties::rich_text(id));
    }
    if let Some(id) = &update.gateway_payment_id {
        props.insert(PAYMENT_ID.into(), properties::rich_text(id));
    }
    props
}

fn count(props: &Properties, name: &str, default: u8) -> u8 {
    properties::read_number(props, name)
        .filter(|n| n.is_finite())
        .map_or(default, |n| n.clamp(0.0, f64::from(u8::MAX)) as u8)
}

/// Converts a database row into a [`BookingRecord`]. Only the status is mandatory.
pub fn booking_record(page: &Page) -> Result<BookingRecord, StoreError> {
    let props = &page.properties;
    let status = properties::read_select(props, STATUS)
        .ok_or_else(|| StoreError::Data(format!("Page {} has no {STATUS}", page.id)))?
        .parse::<BookingStatus>()
        .map_err(|e| StoreError::Data(format!("Page {}: {e}", page.id)))?;
    let amount = properties::read_number(props, AMOUNT)
        .and_then(|a| MinorUnits::try_from_major(a).ok())
        .unwrap_or_default();
    Ok(BookingRecord {
        id: BookingId::from(page.id.as_str()),
        url: page.url.clone(),
        villa_name: properties::read_title(props, VILLA).unwrap_or_default(),
        check_in: properties::read_date(props, CHECK_IN),
        check_out: properties::read_date(props, CHECK_OUT),
        guests: count(props, GUESTS, 1),
        extra_mattresses: count(props, EXTRA_MATTRESSES, 0),
        customer_name: properties::read_rich_text(props, CUSTOMER_NAME).unwrap_or_default(),
        customer_email: properties::read_email(props, EMAIL).unwrap_or_default(),
        customer_phone: properties::read_phone_number(props, PHONE).unwrap_or_default(),
        amount,
        status,
        gateway_order_id: properties::read_rich_text(props, ORDER_ID),
        gateway_payment_id: properties::read_rich_text(props, PAYMENT_ID),
        created_at: page.created_time,
    })
}

impl BookingStore for NotionBookingStore {
    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingHandle, StoreError> {
        debug!("📒️ Recording booking of {} for {}", booking.villa_name, booking.customer_email);
        let page = self.api.create_page(booking_properties(booking)).await.map_err(store_error)?;
        Ok(BookingHandle { id: BookingId::from(page.id), url: page.url })
    }

    async fn update_status(&self, booking_id: &BookingId, update: &StatusUpdate) -> Result<(), StoreError> {
        debug!("📒️ Setting booking {booking_id} to {update}");
        self.api.update_page_properties(booking_id.as_str(), status_properties(update)).await.map_err(store_error)?;
        Ok(())
    }

    async fn fetch_booking(&self, booking_id: &BookingId) -> Result<Option<BookingRecord>, StoreError> {
        match self.api.retrieve_page(booking_id.as_str()).await {
            Ok(page) if page.archived => {
                debug!("📒️ Booking {booking_id} has been archived");
                Ok(None)
            },
            Ok(page) => booking_record(&page).map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(store_error(e)),
        }
    }

    async fn fetch_pending_bookings(&self) -> Result<Vec<BookingRecord>, StoreError> {
        let filter = properties::select_equals(STATUS, &BookingStatus::Pending.to_string());
        let query = DatabaseQuery::with_filter(filter).sorted_by_creation();
        let pages = self.api.query_all(query).await.map_err(store_error)?;
        let bookings = pages
            .iter()
            .filter_map(|page| {
                booking_record(page)
                    .map_err(|e| warn!("📒️ Skipping unreadable booking {}. {e}", page.id))
                    .ok()
            })
            .collect();
        Ok(bookings)
    }
}
