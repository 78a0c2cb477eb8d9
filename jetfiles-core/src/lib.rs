pub mod error;

pub mod config;

pub mod controller {
    pub mod home;
    pub use home::HomeStateHolder;
}

pub mod data {
    pub mod favorites;
    pub use favorites::{FavoriteSet, FavoritesStore};

    pub mod repository;
    pub use repository::{FileRepository, LocalFileRepository};

    pub mod fake;
}

pub mod model {
    pub mod file_record;
    pub use file_record::FileRecord;

    pub mod home_state;
    pub use home_state::{ErrorKind, ErrorMessage, HomeState, HomeUiState};
}

pub mod view {
    pub mod file_list;
    pub use file_list::{FileListView, FileRow};
}

pub mod fs {
    pub mod enumerator;
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;

pub use controller::HomeStateHolder;
