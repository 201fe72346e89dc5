mod double_buffered;
mod ping_pong;
mod resource;
mod storage_buffer;
mod texture;
mod uniform_buffer;

pub use self::double_buffered::*;
pub use self::ping_pong::*;
pub use self::resource::*;
pub use self::storage_buffer::*;
pub use self::texture::*;
pub use self::uniform_buffer::*;
