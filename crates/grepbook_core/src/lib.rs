pub mod domain;
pub mod ids;
pub mod ports;
pub mod views;

pub use domain::{
    create_chapters, BookReview, BookReviewDelta, Chapter, ChapterDelta, NewBookReview,
    ReorderRequest, Session, User, UserCredentials, UserDelta,
};
pub use ids::{new_session_key, new_uid};
pub use ports::{
    BookReviewService, Clock, PortError, PortResult, SessionService, SystemClock, UserService,
};
pub use views::{partition_by_status, sort_chronologically};
