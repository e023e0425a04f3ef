/// Authentication and authorization
///
/// # Modules
///
/// - [`credentials`]: login form extraction
/// - [`login`]: lookup, verification and outcome stages of a login attempt
/// - [`password`]: Argon2id hashing and the [`password::PasswordEncoder`] seam
/// - [`session`]: HS256 session tokens carried in the session cookie
/// - [`context`]: the per-request [`context::SecurityContext`]
/// - [`authorization`]: capabilities and the task deletion policy
/// - [`notice`]: one-time user notices attached to responses

pub mod authorization;
pub mod context;
pub mod credentials;
pub mod login;
pub mod notice;
pub mod password;
pub mod session;
