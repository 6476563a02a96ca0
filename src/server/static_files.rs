//! Embedded browser UI. Three small files served as string constants so
//! the binary stays self-contained.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Branch Beacon</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header class="nav">
    <span class="brand">Branch Beacon</span>
  </header>

  <section class="hero">
    <h1>Find Your Nearest Branch</h1>
    <p class="subtitle">We'll use your location to find the closest branch to you</p>
    <button id="locate" class="btn primary">Use My Location</button>
    <p id="near-error" class="error hidden"></p>
  </section>

  <section class="section hidden" id="nearest-section">
    <h2>Nearest Branches</h2>
    <p class="subtitle">Based on your current location</p>
    <div id="nearest" class="branch-list"></div>
  </section>

  <section class="section">
    <h2>Search by name, city, country, or ZIP code</h2>
    <div class="input-row">
      <input id="q" class="input" placeholder="e.g., Tampa, 10001, Brightstream">
      <button id="search" class="btn">Find Branches</button>
    </div>
    <p id="search-error" class="error hidden"></p>
    <div id="results" class="branch-list"></div>
  </section>

  <section class="section">
    <h2>Browse by Country</h2>
    <p class="subtitle">Select a country to view all branch locations</p>
    <div id="countries" class="country-grid"></div>
    <div id="country-branches" class="branch-list"></div>
  </section>

  <script src="/app.js"></script>
</body>
</html>
"#;

pub const STYLE_CSS: &str = r#"
:root {
  --ink: #1b2733;
  --muted: #5b6b7a;
  --accent: #0b66c3;
  --line: #dde5ec;
}
* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  color: var(--ink);
  background: #f7f9fb;
}
.nav { padding: 14px 24px; border-bottom: 1px solid var(--line); background: #fff; }
.brand { font-weight: 700; letter-spacing: 0.02em; }
.hero { text-align: center; padding: 56px 24px 32px; }
.hero h1 { margin: 0 0 8px; font-size: 2rem; }
.subtitle { color: var(--muted); margin: 0 0 18px; }
.section { max-width: 860px; margin: 0 auto; padding: 24px; }
.section h2 { margin: 0 0 6px; font-size: 1.2rem; }
.input-row { display: flex; gap: 10px; margin-top: 12px; }
.input {
  flex: 1; padding: 10px 12px; border: 1px solid var(--line);
  border-radius: 8px; font-size: 1rem;
}
.btn {
  padding: 10px 18px; border: 1px solid var(--line); border-radius: 8px;
  background: #fff; cursor: pointer; font-size: 1rem;
}
.btn.primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.btn:disabled { opacity: 0.6; cursor: wait; }
.branch-list { display: grid; gap: 12px; margin-top: 16px; }
.branch-card {
  background: #fff; border: 1px solid var(--line); border-radius: 10px;
  padding: 14px 16px;
}
.branch-card h3 { margin: 0 0 4px; font-size: 1.05rem; }
.branch-card p { margin: 2px 0; color: var(--muted); font-size: 0.92rem; }
.distance { color: var(--accent); font-weight: 600; }
.country-grid {
  display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr));
  gap: 10px; margin-top: 16px;
}
.country {
  background: #fff; border: 1px solid var(--line); border-radius: 10px;
  padding: 14px; cursor: pointer; text-align: center; font-weight: 600;
}
.country:hover { border-color: var(--accent); }
.error { color: #b3261e; }
.hidden { display: none; }
"#;

pub const APP_JS: &str = r#"
async function api(path) {
  const res = await fetch(path);
  const json = await res.json();
  if (!res.ok) throw new Error(json.error || ("HTTP " + res.status));
  return json;
}

function branchCard(b) {
  const card = document.createElement("div");
  card.className = "branch-card";
  const lines = [];
  if (b.street) lines.push(b.street);
  const cityLine = [b.city, b.zip_code, b.country].filter(Boolean).join(", ");
  if (cityLine) lines.push(cityLine);
  if (b.phone) lines.push(b.phone);
  if (b.email) lines.push(b.email);
  card.innerHTML = "<h3>" + (b.name || b.id) + "</h3>"
    + lines.map((l) => "<p>" + l + "</p>").join("")
    + (typeof b.distance_miles === "number"
        ? "<p class='distance'>" + b.distance_miles.toFixed(1) + " miles away</p>"
        : "");
  return card;
}

function render(el, branches) {
  el.replaceChildren(...branches.map(branchCard));
  if (branches.length === 0) {
    el.textContent = "No branches found.";
  }
}

document.getElementById("locate").addEventListener("click", () => {
  const btn = document.getElementById("locate");
  const err = document.getElementById("near-error");
  err.classList.add("hidden");

  if (!("geolocation" in navigator)) {
    err.textContent = "Geolocation is not supported in this browser.";
    err.classList.remove("hidden");
    return;
  }

  btn.disabled = true;
  btn.textContent = "Locating…";
  navigator.geolocation.getCurrentPosition(
    async (pos) => {
      try {
        const rows = await api(
          "/api/nearest?lat=" + pos.coords.latitude + "&lon=" + pos.coords.longitude + "&limit=10"
        );
        document.getElementById("nearest-section").classList.remove("hidden");
        render(document.getElementById("nearest"), rows);
      } catch (e) {
        err.textContent = e.message;
        err.classList.remove("hidden");
      } finally {
        btn.disabled = false;
        btn.textContent = "Use My Location";
      }
    },
    (geoErr) => {
      err.textContent = geoErr.message || "Location permission denied.";
      err.classList.remove("hidden");
      btn.disabled = false;
      btn.textContent = "Use My Location";
    },
    { enableHighAccuracy: true, timeout: 12000 }
  );
});

async function runSearch() {
  const term = document.getElementById("q").value.trim();
  const err = document.getElementById("search-error");
  err.classList.add("hidden");
  if (!term) return;
  try {
    const rows = await api("/api/search?q=" + encodeURIComponent(term) + "&limit=100");
    render(document.getElementById("results"), rows);
  } catch (e) {
    err.textContent = e.message;
    err.classList.remove("hidden");
  }
}

document.getElementById("search").addEventListener("click", runSearch);
document.getElementById("q").addEventListener("keydown", (e) => {
  if (e.key === "Enter") runSearch();
});

async function loadCountries() {
  const grid = document.getElementById("countries");
  try {
    const countries = await api("/api/countries");
    grid.replaceChildren(
      ...countries.map((c) => {
        const el = document.createElement("div");
        el.className = "country";
        el.textContent = c.name;
        el.addEventListener("click", async () => {
          const rows = await api(
            "/api/countries/" + encodeURIComponent(c.code) + "/branches?limit=100"
          );
          render(document.getElementById("country-branches"), rows);
        });
        return el;
      })
    );
  } catch (e) {
    grid.textContent = "Failed to load countries.";
  }
}

loadCountries();
"#;
