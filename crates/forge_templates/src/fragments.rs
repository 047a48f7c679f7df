//! Fragment bundles: the markup, stylesheet and script snippets each update
//! strategy adds to an existing application.
//!
//! Every fragment is self-contained and valid when concatenated to arbitrary
//! existing content. Stylesheet and script fragments start with a newline so
//! appending them never fuses with a last line that lacks one.

use tracing::debug;

use crate::renderer::TemplateRenderer;
use crate::strategy::UpdateStrategy;

/// Literal markup anchor a fragment is inserted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Right after the opening `<body>` tag.
    BodyOpen,
    /// Right before the closing `</body>` tag.
    BodyClose,
}

impl Anchor {
    pub const BODY_OPEN: &'static str = "<body>";
    pub const BODY_CLOSE: &'static str = "</body>";

    /// The literal tag text this anchor matches.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::BodyOpen => Self::BODY_OPEN,
            Self::BodyClose => Self::BODY_CLOSE,
        }
    }
}

/// Snippets associated with one update strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentBundle {
    pub strategy: UpdateStrategy,
    /// Where the markup fragment goes.
    pub anchor: Anchor,
    /// Markup inserted at the anchor.
    pub markup: String,
    /// Appended to the stylesheet.
    pub stylesheet: String,
    /// Appended to the script, when the strategy has one.
    pub script: Option<String>,
}

/// Fixed catalog of fragment bundles.
pub struct FragmentLibrary {
    renderer: TemplateRenderer,
}

impl Default for FragmentLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentLibrary {
    pub fn new() -> Self {
        Self {
            renderer: TemplateRenderer::new(),
        }
    }

    /// Whether a bundle exists for the strategy.
    pub fn supports(&self, strategy: UpdateStrategy) -> bool {
        !matches!(strategy, UpdateStrategy::Charts)
    }

    /// Render the bundle for a strategy.
    ///
    /// `brief` is only quoted by the generic enhancement notice. Returns `None`
    /// for strategies that have no bundle.
    pub fn bundle(&self, strategy: UpdateStrategy, brief: &str) -> Option<FragmentBundle> {
        let bundle = match strategy {
            UpdateStrategy::DarkMode => FragmentBundle {
                strategy,
                anchor: Anchor::BodyOpen,
                markup: DARK_MODE_HTML.to_string(),
                stylesheet: DARK_MODE_CSS.to_string(),
                script: Some(DARK_MODE_JS.to_string()),
            },
            UpdateStrategy::Search => FragmentBundle {
                strategy,
                anchor: Anchor::BodyOpen,
                markup: SEARCH_HTML.to_string(),
                stylesheet: SEARCH_CSS.to_string(),
                script: Some(SEARCH_JS.to_string()),
            },
            UpdateStrategy::Favorites => FragmentBundle {
                strategy,
                anchor: Anchor::BodyClose,
                markup: FAVORITES_HTML.to_string(),
                stylesheet: FAVORITES_CSS.to_string(),
                script: Some(FAVORITES_JS.to_string()),
            },
            UpdateStrategy::GenericEnhancement => FragmentBundle {
                strategy,
                anchor: Anchor::BodyOpen,
                markup: self.renderer.render_with(ENHANCEMENT_HTML, &[("brief", brief)]),
                stylesheet: ENHANCEMENT_CSS.to_string(),
                script: None,
            },
            UpdateStrategy::Charts => {
                debug!("No fragment bundle registered for strategy {}", strategy);
                return None;
            }
        };
        Some(bundle)
    }
}

// Dark mode

const DARK_MODE_HTML: &str = r#"    <!-- Dark Mode Toggle -->
    <div class="dark-mode-toggle">
        <button id="darkModeToggle" class="btn btn-outline-secondary">🌙 Dark Mode</button>
    </div>"#;

const DARK_MODE_CSS: &str = r#"
/* Dark Mode Styles */
body.dark-mode {
    background-color: #1a1a1a;
    color: #ffffff;
}

body.dark-mode .container,
body.dark-mode .app-container,
body.dark-mode .card,
body.dark-mode .feature-card {
    background-color: #2d2d2d;
    color: #ffffff;
}

body.dark-mode .btn {
    border-color: #555;
}

.dark-mode-toggle {
    position: fixed;
    top: 20px;
    right: 20px;
    z-index: 1000;
}
"#;

const DARK_MODE_JS: &str = r#"
// Dark Mode Functionality
function toggleDarkMode() {
    document.body.classList.toggle('dark-mode');
    const toggleBtn = document.getElementById('darkModeToggle');
    const enabled = document.body.classList.contains('dark-mode');
    if (toggleBtn) {
        toggleBtn.textContent = enabled ? '☀️ Light Mode' : '🌙 Dark Mode';
    }
    localStorage.setItem('darkMode', enabled ? 'enabled' : 'disabled');
}

document.addEventListener('DOMContentLoaded', function() {
    const darkModeToggle = document.getElementById('darkModeToggle');
    if (darkModeToggle) {
        darkModeToggle.addEventListener('click', toggleDarkMode);
    }

    if (localStorage.getItem('darkMode') === 'enabled') {
        document.body.classList.add('dark-mode');
        if (darkModeToggle) darkModeToggle.textContent = '☀️ Light Mode';
    }
});
"#;

// Search

const SEARCH_HTML: &str = r#"    <!-- Search Functionality -->
    <div class="search-container mb-4">
        <div class="input-group">
            <input type="text" id="searchInput" class="form-control" placeholder="Search...">
            <button id="searchButton" class="btn btn-primary">Search</button>
        </div>
        <div id="searchResults" class="mt-3"></div>
    </div>"#;

const SEARCH_CSS: &str = r#"
/* Search Styles */
.search-container {
    max-width: 600px;
    margin: 0 auto 20px auto;
}

.search-result-item {
    padding: 10px;
    margin: 5px 0;
    background: #f8f9fa;
    border-radius: 5px;
    border-left: 3px solid #007bff;
}

.search-highlight {
    background-color: yellow;
    font-weight: bold;
}
"#;

const SEARCH_JS: &str = r#"
// Search Functionality
function performSearch() {
    const searchTerm = document.getElementById('searchInput').value.toLowerCase();
    const resultsContainer = document.getElementById('searchResults');

    if (!searchTerm) {
        resultsContainer.innerHTML = '<p class="text-muted">Enter a search term</p>';
        return;
    }

    const pageContent = document.body.textContent.toLowerCase();
    if (pageContent.includes(searchTerm)) {
        resultsContainer.innerHTML = `
            <div class="search-result-item">
                <strong>Found matches for:</strong> "${searchTerm}"
                <br><small>Content contains your search term</small>
            </div>
        `;
        highlightText(searchTerm);
    } else {
        resultsContainer.innerHTML = '<p class="text-muted">No results found</p>';
    }
}

function highlightText(searchTerm) {
    const escaped = searchTerm.replace(/[.*+?^${}()|[\]\\]/g, '\\$&');
    document.body.innerHTML = document.body.innerHTML.replace(
        new RegExp(escaped, 'gi'),
        match => `<span class="search-highlight">${match}</span>`
    );
}

document.addEventListener('DOMContentLoaded', function() {
    const searchButton = document.getElementById('searchButton');
    const searchInput = document.getElementById('searchInput');

    if (searchButton) {
        searchButton.addEventListener('click', performSearch);
    }

    if (searchInput) {
        searchInput.addEventListener('keypress', function(e) {
            if (e.key === 'Enter') {
                performSearch();
            }
        });
    }
});
"#;

// Favorites

const FAVORITES_HTML: &str = r#"    <!-- Favorites Section -->
    <div class="favorites-section mt-4">
        <h3>⭐ Favorites</h3>
        <div id="favoritesList" class="favorites-list"></div>
    </div>"#;

const FAVORITES_CSS: &str = r#"
/* Favorites Styles */
.favorites-section {
    background: #fff3cd;
    padding: 20px;
    border-radius: 8px;
    border-left: 4px solid #ffc107;
}

.favorite-item {
    background: white;
    padding: 10px;
    margin: 5px 0;
    border-radius: 5px;
    display: flex;
    justify-content: space-between;
    align-items: center;
}

.favorite-item button {
    background: none;
    border: none;
    color: #dc3545;
    cursor: pointer;
}

.add-to-favorites {
    background: #ffc107;
    border: none;
    padding: 5px 10px;
    border-radius: 3px;
    cursor: pointer;
}
"#;

const FAVORITES_JS: &str = r#"
// Favorites Functionality
class FavoritesManager {
    constructor() {
        this.favorites = JSON.parse(localStorage.getItem('favorites')) || [];
        this.renderFavorites();
    }

    addFavorite(item) {
        if (!this.favorites.includes(item)) {
            this.favorites.push(item);
            this.saveFavorites();
            this.renderFavorites();
        }
    }

    removeFavorite(item) {
        this.favorites = this.favorites.filter(fav => fav !== item);
        this.saveFavorites();
        this.renderFavorites();
    }

    saveFavorites() {
        localStorage.setItem('favorites', JSON.stringify(this.favorites));
    }

    renderFavorites() {
        const favoritesList = document.getElementById('favoritesList');
        if (!favoritesList) {
            return;
        }
        favoritesList.innerHTML = '';
        if (this.favorites.length === 0) {
            favoritesList.innerHTML = '<p class="text-muted">No favorites yet. Add some items to your favorites!</p>';
            return;
        }
        this.favorites.forEach(item => {
            const row = document.createElement('div');
            row.className = 'favorite-item';
            const label = document.createElement('span');
            label.textContent = item;
            const remove = document.createElement('button');
            remove.textContent = '❌';
            remove.addEventListener('click', () => this.removeFavorite(item));
            row.appendChild(label);
            row.appendChild(remove);
            favoritesList.appendChild(row);
        });
    }
}

const favoritesManager = new FavoritesManager();

function addCurrentToFavorites() {
    const itemName = document.title || 'Current Item';
    favoritesManager.addFavorite(itemName);
    alert(`Added "${itemName}" to favorites!`);
}

document.addEventListener('DOMContentLoaded', function() {
    favoritesManager.renderFavorites();
    const mainContent = document.querySelector('.container, .app-container');
    if (mainContent) {
        const favoriteBtn = document.createElement('button');
        favoriteBtn.className = 'add-to-favorites mb-3';
        favoriteBtn.textContent = '⭐ Add to Favorites';
        favoriteBtn.onclick = addCurrentToFavorites;
        mainContent.insertBefore(favoriteBtn, mainContent.firstChild);
    }
});
"#;

// Generic enhancement

const ENHANCEMENT_HTML: &str = r#"    <!-- Enhancement Update -->
    <div class="enhancement-notice alert alert-info">
        <h4>🚀 App Enhanced!</h4>
        <p><strong>Update:</strong> {{brief}}</p>
    </div>"#;

const ENHANCEMENT_CSS: &str = r#"
/* Enhanced Styles */
.enhancement-notice {
    border-left: 4px solid #17a2b8;
}

.feature-enhanced {
    animation: pulse 2s infinite;
}

@keyframes pulse {
    0% { transform: scale(1); }
    50% { transform: scale(1.02); }
    100% { transform: scale(1); }
}
"#;
