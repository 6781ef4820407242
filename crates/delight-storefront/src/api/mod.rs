//! Remote interfaces: the cart service and the payment gateway.

pub mod cart;
pub mod gateway;

pub use cart::{AddItemResponse, CartApi, CartSnapshot, HttpCartClient, MockCartApi};
pub use gateway::{
    CheckoutOptions, HttpPaymentGateway, MockPaymentGateway, MockPaymentWidget, PaymentGateway,
    PaymentWidget, WidgetOutcome,
};
