pub mod booking_events;
pub mod notion;
pub mod razorpay;
