pub mod auth_service;
pub mod catalogue_service;
pub mod comment_service;
pub mod confirmation;
pub mod permissions;
pub mod review_service;
pub mod token;
pub mod user_service;

pub use auth_service::AuthService;
pub use catalogue_service::{CatalogueService, TitleFilter, TitlePatch, TitleWithRating};
pub use comment_service::CommentService;
pub use confirmation::ConfirmationCodes;
pub use permissions::{may_access, may_modify, Action, Actor, ResourceKind};
pub use review_service::ReviewService;
pub use token::{Claims, TokenIssuer};
pub use user_service::{NewUser, UserPatch, UserService};
