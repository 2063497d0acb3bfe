pub mod article;
pub mod currency;
pub mod details;
pub mod freight;
pub mod home;
pub mod knowledge;
pub mod prices;

pub use article::ArticlePage;
pub use currency::CurrencyPage;
pub use details::DetailsPage;
pub use freight::FreightPage;
pub use home::HomePage;
pub use knowledge::KnowledgePage;
pub use prices::PricesPage;
