pub mod clock;
pub mod factory;
pub mod guard;
pub mod role;
pub mod token_codec;

pub use clock::{Clock, FixedClock, SystemClock};
pub use factory::build_token_codec;
pub use guard::{AuthError, RoleGuard};
pub use role::{Role, RoleRequirement};
pub use token_codec::{
    BEARER_PREFIX, Claims, SigningKey, SigningKeyError, TOKEN_TTL_MINUTES, TokenCodec, TokenError,
    strip_bearer,
};
