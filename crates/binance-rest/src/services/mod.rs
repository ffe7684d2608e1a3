//! Endpoint builders, one per REST operation.
//!
//! Each builder borrows the client, collects parameters through fluent
//! setters and is consumed by `send`.

mod alpha;
mod margin;
mod market;
mod simple_earn;
mod trade;
mod user_stream;

pub use alpha::{
    AlphaKline, AlphaKlineRow, AlphaKlinesResponse, AlphaKlinesService, AlphaResponse,
    AlphaTicker, AlphaTickerResponse, AlphaTickerService, AlphaTickers, AlphaToken,
    AlphaTokensResponse, AlphaTokensService, ALPHA_SUCCESS_CODE,
};
pub use margin::{
    MarginAccount, MarginAccountService, MarginAsset, MarginMaxBorrowableService, MaxBorrowable,
};
pub use market::{DepthService, KlinesService, PingService, ServerTimeService};
pub use simple_earn::{
    FlexiblePosition, FlexiblePositionList, FlexiblePositionService, FlexibleProduct,
    FlexibleProductList, RedeemFlexibleResponse, RedeemFlexibleService,
    SimpleEarnFlexibleProductListService, SubscribeFlexibleResponse, SubscribeFlexibleService,
};
pub use trade::{CancelOrderService, NewOrderService, QueryOrderService};
