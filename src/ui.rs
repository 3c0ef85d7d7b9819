pub fn render_index(today: &str) -> String {
    INDEX_HTML.replace("{{TODAY}}", today)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>MedControl</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef6f4;
      --bg-2: #cfe8e0;
      --ink: #22312d;
      --accent: #0f8a6d;
      --accent-2: #2f4858;
      --danger: #c63b2b;
      --warn: #b07c18;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3f1ec 60%, #f2f7f1 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1060px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: baseline;
      justify-content: space-between;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 0;
      color: #5c6b66;
      font-size: 1rem;
    }

    .userbar {
      display: flex;
      align-items: center;
      gap: 12px;
      font-size: 0.95rem;
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .grid-2 {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 16px;
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #5e6b66;
      box-shadow: none;
      cursor: pointer;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.92rem;
    }

    th, td {
      text-align: left;
      padding: 10px 8px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.1);
      vertical-align: top;
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #7b857f;
    }

    button, .btn {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-size: 0.92rem;
      font-weight: 600;
      cursor: pointer;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 8px;
      transition: transform 150ms ease, box-shadow 150ms ease;
      text-decoration: none;
      background: rgba(47, 72, 88, 0.08);
      color: var(--accent-2);
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-primary {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(15, 138, 109, 0.3);
    }

    .btn-quiet {
      background: transparent;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    .btn-danger {
      background: rgba(198, 59, 43, 0.1);
      color: var(--danger);
    }

    .btn-ok {
      background: rgba(15, 138, 109, 0.12);
      color: var(--accent);
    }

    form.stack {
      display: grid;
      gap: 10px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      color: #5c6b66;
    }

    input, select, textarea {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.18);
      background: white;
    }

    textarea {
      resize: vertical;
      min-height: 70px;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: end;
    }

    .pill {
      display: inline-block;
      padding: 3px 10px;
      border-radius: 999px;
      font-size: 0.8rem;
      font-weight: 600;
    }

    .pill.pending { background: #fdf3d7; color: var(--warn); }
    .pill.completed { background: #def4e7; color: #1f7a4c; }
    .pill.missed { background: #fbe2de; color: var(--danger); }
    .pill.morning { background: #e0edfb; color: #2b5d99; }
    .pill.afternoon { background: #fbe9d8; color: #a05a1c; }
    .pill.night { background: #e9e2f7; color: #5a3d99; }

    .alert-banner {
      display: none;
      background: #fbe2de;
      border: 1px solid rgba(198, 59, 43, 0.3);
      color: var(--danger);
      border-radius: 14px;
      padding: 12px 16px;
      font-weight: 600;
    }

    .alert-banner.visible {
      display: block;
      animation: pulse 1.6s ease infinite;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b958f;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stats-row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .status {
      font-size: 0.95rem;
      color: #5e6b66;
      min-height: 1.2em;
    }

    .status[data-type="error"] { color: var(--danger); }
    .status[data-type="ok"] { color: #1f7a4c; }

    .post {
      border-bottom: 1px solid rgba(47, 72, 88, 0.1);
      padding: 12px 0;
      display: grid;
      gap: 6px;
    }

    .post .meta {
      display: flex;
      gap: 10px;
      align-items: center;
      font-size: 0.85rem;
      color: #7b857f;
    }

    .avatar {
      display: inline-grid;
      place-items: center;
      width: 34px;
      height: 34px;
      border-radius: 50%;
      background: var(--accent-2);
      color: white;
      font-size: 0.8rem;
      font-weight: 600;
    }

    .hidden { display: none !important; }

    .muted {
      color: #7b857f;
      font-size: 0.88rem;
    }

    @keyframes rise {
      from { opacity: 0; transform: translateY(18px); }
      to { opacity: 1; transform: translateY(0); }
    }

    @keyframes pulse {
      0%, 100% { opacity: 1; }
      50% { opacity: 0.65; }
    }

    @media (max-width: 640px) {
      .app { padding: 26px 20px; }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>MedControl</h1>
        <p class="subtitle">Medications, schedules and caregivers in one place.</p>
      </div>
      <div class="userbar hidden" id="userbar">
        <span id="user-name"></span>
        <span class="pill pending" id="user-type"></span>
        <button class="btn-quiet" id="logout-btn" type="button">Sign out</button>
      </div>
    </header>

    <section id="auth-section" class="grid-2">
      <div class="card">
        <h2>Sign in</h2>
        <form id="login-form" class="stack">
          <label>Email
            <input type="email" id="login-email" required />
          </label>
          <label>Password
            <input type="password" id="login-password" required />
          </label>
          <button class="btn-primary" type="submit">Sign in</button>
        </form>
      </div>
      <div class="card">
        <h2>Create account</h2>
        <form id="register-form" class="stack">
          <label>Name
            <input type="text" id="register-name" required />
          </label>
          <label>Email
            <input type="email" id="register-email" required />
          </label>
          <label>Password
            <input type="password" id="register-password" required />
          </label>
          <label>I am a
            <select id="register-type">
              <option value="patient">Patient</option>
              <option value="caregiver">Caregiver</option>
            </select>
          </label>
          <button class="btn-primary" type="submit">Create account</button>
        </form>
      </div>
    </section>

    <div id="app-section" class="hidden" style="display: grid; gap: 20px;">
      <nav class="tabs" role="tablist">
        <button class="tab active" type="button" data-tab="medications" role="tab">Medications</button>
        <button class="tab" type="button" data-tab="schedules" role="tab">Schedules</button>
        <button class="tab" type="button" data-tab="caregivers" role="tab">Caregivers</button>
        <button class="tab" type="button" data-tab="reports" role="tab">Reports</button>
        <button class="tab" type="button" data-tab="reminders" role="tab">Reminders</button>
        <button class="tab" type="button" data-tab="community" role="tab">Community</button>
        <button class="tab" type="button" data-tab="reference" role="tab">Database</button>
      </nav>

      <section id="panel-medications" class="panel card">
        <h2>My medications</h2>
        <div id="medications-table"></div>
        <h2 style="margin-top: 18px;" id="medication-form-title">Add medication</h2>
        <form id="medication-form" class="stack">
          <input type="hidden" id="medication-id" value="" />
          <div class="row">
            <label>Name
              <input type="text" id="medication-name" required />
            </label>
            <label>Dosage
              <input type="text" id="medication-dosage" placeholder="500mg" required />
            </label>
            <label>Interval
              <input type="text" id="medication-interval" placeholder="every 8 hours" />
            </label>
          </div>
          <div class="row">
            <label>Price
              <input type="text" id="medication-price" placeholder="R$ 0,00" />
            </label>
            <label>Pharmacy
              <input type="text" id="medication-pharmacy" />
            </label>
          </div>
          <label>Observations
            <input type="text" id="medication-observations" />
          </label>
          <div class="row">
            <button class="btn-primary" type="submit" id="medication-submit">Add</button>
            <button class="btn-quiet hidden" type="button" id="medication-cancel">Cancel edit</button>
          </div>
        </form>
      </section>

      <section id="panel-schedules" class="panel card hidden">
        <h2>Schedules</h2>
        <div class="alert-banner" id="alert-banner"></div>
        <div class="row" style="margin: 12px 0;">
          <label>Date
            <input type="date" id="schedule-date" value="{{TODAY}}" />
          </label>
          <button class="btn-quiet" type="button" id="simulate-alert">Simulate alert</button>
        </div>
        <div id="schedules-table"></div>
        <h2 style="margin-top: 18px;">New schedule</h2>
        <form id="schedule-form" class="stack">
          <div class="row">
            <label>Medication
              <select id="schedule-medication"></select>
            </label>
            <label>Date
              <input type="date" id="schedule-new-date" value="{{TODAY}}" required />
            </label>
            <label>Time
              <input type="time" id="schedule-time" value="08:00" required />
            </label>
            <button class="btn-primary" type="submit">Add</button>
          </div>
        </form>
      </section>

      <section id="panel-caregivers" class="panel card hidden">
        <h2>Caregivers</h2>
        <div id="caregivers-table"></div>
        <h2 style="margin-top: 18px;" id="caregiver-form-title">Add caregiver</h2>
        <form id="caregiver-form" class="stack">
          <input type="hidden" id="caregiver-id" value="" />
          <div class="row">
            <label>Name
              <input type="text" id="caregiver-name" required />
            </label>
            <label>Phone
              <input type="text" id="caregiver-phone" placeholder="(11) 98765-4321" />
            </label>
            <label>Email
              <input type="email" id="caregiver-email" />
            </label>
          </div>
          <div class="row">
            <label>Shift
              <input type="text" id="caregiver-shift" placeholder="Morning (07:00 - 15:00)" />
            </label>
            <label>Notes
              <input type="text" id="caregiver-notes" />
            </label>
          </div>
          <div class="row">
            <button class="btn-primary" type="submit" id="caregiver-submit">Add</button>
            <button class="btn-quiet hidden" type="button" id="caregiver-cancel">Cancel edit</button>
          </div>
        </form>
      </section>

      <section id="panel-reports" class="panel card hidden">
        <h2>Reports</h2>
        <div class="row" style="margin-bottom: 14px;">
          <label>Type
            <select id="report-type">
              <option value="medication">Medication</option>
              <option value="financial">Financial</option>
              <option value="quality">Quality</option>
            </select>
          </label>
          <label>From
            <input type="date" id="report-start" />
          </label>
          <label>To
            <input type="date" id="report-end" />
          </label>
          <button class="btn-quiet" type="button" id="report-refresh">Refresh</button>
          <button class="btn-primary" type="button" id="report-pdf">Download PDF</button>
        </div>
        <div id="report-content"></div>
      </section>

      <section id="panel-reminders" class="panel card hidden">
        <h2>Reminder settings</h2>
        <form id="reminder-form" class="stack">
          <label style="flex-direction: row; display: flex; align-items: center; gap: 8px;">
            <input type="checkbox" id="reminder-enabled" style="width: auto;" />
            Enable WhatsApp reminders
          </label>
          <div class="row">
            <label>WhatsApp number
              <input type="text" id="reminder-phone" placeholder="(11) 98765-4321" />
            </label>
            <label>Lead time (minutes)
              <input type="number" id="reminder-lead" min="0" max="60" />
            </label>
          </div>
          <label>Custom message
            <textarea id="reminder-message"></textarea>
          </label>
          <div class="row">
            <button class="btn-primary" type="submit">Save settings</button>
            <button class="btn-quiet" type="button" id="reminder-test">Send test message</button>
            <button class="btn-quiet" type="button" id="reminder-test-direct">Open WhatsApp directly</button>
          </div>
        </form>
      </section>

      <section id="panel-community" class="panel card hidden">
        <h2>Community</h2>
        <form id="post-form" class="stack" style="margin-bottom: 14px;">
          <label>Share something
            <textarea id="post-content" placeholder="Ask a question or share a tip..."></textarea>
          </label>
          <div class="row">
            <label>Category
              <select id="post-category">
                <option value="general">General</option>
                <option value="medications">Medications</option>
                <option value="caregivers">Caregivers</option>
              </select>
            </label>
            <button class="btn-primary" type="submit">Post</button>
          </div>
        </form>
        <div class="grid-2">
          <div>
            <h2>Forum</h2>
            <div id="posts-list"></div>
          </div>
          <div>
            <h2>Groups</h2>
            <div id="groups-list"></div>
          </div>
        </div>
      </section>

      <section id="panel-reference" class="panel card hidden">
        <h2>Medication database</h2>
        <div class="row" style="margin-bottom: 12px;">
          <label>Search
            <input type="text" id="reference-search" placeholder="name, generic or class" />
          </label>
          <label style="flex-direction: row; display: flex; align-items: center; gap: 8px;">
            <input type="checkbox" id="reference-favorites" style="width: auto;" />
            Favorites only
          </label>
        </div>
        <div id="reference-table"></div>
      </section>
    </div>

    <div class="status" id="status"></div>
    <p class="hint muted">All data stays on this device. Alerts are raised manually; reminder links open your messaging app with a pre-filled text.</p>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const authSection = document.getElementById('auth-section');
    const appSection = document.getElementById('app-section');
    const userbar = document.getElementById('userbar');
    const tabs = Array.from(document.querySelectorAll('.tab'));
    const TOKEN_KEY = 'medcontrol-token';

    let currentUser = null;
    let medications = [];

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (type === 'ok') {
        setTimeout(() => {
          if (statusEl.textContent === message) {
            statusEl.textContent = '';
            statusEl.dataset.type = '';
          }
        }, 2200);
      }
    };

    const escapeHtml = (value) =>
      String(value ?? '').replace(/[&<>"']/g, (ch) => ({
        '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
      }[ch]));

    const api = async (path, options = {}) => {
      const headers = { 'content-type': 'application/json' };
      const token = localStorage.getItem(TOKEN_KEY);
      if (token) {
        headers['x-session-token'] = token;
      }
      const res = await fetch(path, { headers, ...options });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      const type = res.headers.get('content-type') || '';
      return type.includes('application/json') ? res.json() : res.text();
    };

    // ---- auth ----

    const showApp = (user) => {
      currentUser = user;
      authSection.classList.add('hidden');
      appSection.classList.remove('hidden');
      userbar.classList.remove('hidden');
      document.getElementById('user-name').textContent = user.name;
      document.getElementById('user-type').textContent = user.user_type;
      refreshAll().catch((err) => setStatus(err.message, 'error'));
    };

    const showAuth = () => {
      currentUser = null;
      localStorage.removeItem(TOKEN_KEY);
      authSection.classList.remove('hidden');
      appSection.classList.add('hidden');
      userbar.classList.add('hidden');
    };

    document.getElementById('login-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/auth/login', {
        method: 'POST',
        body: JSON.stringify({
          email: document.getElementById('login-email').value,
          password: document.getElementById('login-password').value
        })
      })
        .then((session) => {
          localStorage.setItem(TOKEN_KEY, session.token);
          setStatus('Signed in', 'ok');
          showApp(session.user);
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('register-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/auth/register', {
        method: 'POST',
        body: JSON.stringify({
          name: document.getElementById('register-name').value,
          email: document.getElementById('register-email').value,
          password: document.getElementById('register-password').value,
          user_type: document.getElementById('register-type').value
        })
      })
        .then(() => setStatus('Account created, you can sign in now', 'ok'))
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('logout-btn').addEventListener('click', () => {
      const token = localStorage.getItem(TOKEN_KEY);
      api('/api/auth/logout', { method: 'POST', body: JSON.stringify({ token }) })
        .catch(() => {})
        .finally(() => {
          showAuth();
          setStatus('Signed out', 'ok');
        });
    });

    // ---- tabs ----

    const setActiveTab = (name) => {
      tabs.forEach((tab) => {
        tab.classList.toggle('active', tab.dataset.tab === name);
      });
      document.querySelectorAll('.panel').forEach((panel) => {
        panel.classList.toggle('hidden', panel.id !== `panel-${name}`);
      });
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => setActiveTab(button.dataset.tab));
    });

    // ---- medications ----

    const renderMedications = () => {
      const target = document.getElementById('medications-table');
      if (!medications.length) {
        target.innerHTML = '<p class="muted">No medications registered yet.</p>';
      } else {
        target.innerHTML = `
          <table>
            <thead><tr>
              <th>Name</th><th>Dosage</th><th>Interval</th><th>Price</th><th>Pharmacy</th><th>Observations</th><th>Actions</th>
            </tr></thead>
            <tbody>
              ${medications.map((med) => `
                <tr>
                  <td><strong>${escapeHtml(med.name)}</strong></td>
                  <td>${escapeHtml(med.dosage)}</td>
                  <td>${escapeHtml(med.interval)}</td>
                  <td>${escapeHtml(med.price)}</td>
                  <td>${escapeHtml(med.pharmacy)}</td>
                  <td>${escapeHtml(med.observations)}</td>
                  <td>
                    <button class="btn-quiet" data-edit-med="${med.id}" type="button">Edit</button>
                    <button class="btn-danger" data-delete-med="${med.id}" type="button">Remove</button>
                  </td>
                </tr>`).join('')}
            </tbody>
          </table>`;
      }

      const select = document.getElementById('schedule-medication');
      select.innerHTML = medications
        .map((med) => `<option value="${med.id}">${escapeHtml(med.name)}</option>`)
        .join('');
    };

    const loadMedications = async () => {
      medications = await api('/api/medications');
      renderMedications();
    };

    const resetMedicationForm = () => {
      document.getElementById('medication-id').value = '';
      document.getElementById('medication-form').reset();
      document.getElementById('medication-form-title').textContent = 'Add medication';
      document.getElementById('medication-submit').textContent = 'Add';
      document.getElementById('medication-cancel').classList.add('hidden');
    };

    document.getElementById('medications-table').addEventListener('click', (event) => {
      const editId = event.target.dataset.editMed;
      const deleteId = event.target.dataset.deleteMed;
      if (editId) {
        const med = medications.find((m) => m.id === Number(editId));
        if (!med) return;
        document.getElementById('medication-id').value = med.id;
        document.getElementById('medication-name').value = med.name;
        document.getElementById('medication-dosage').value = med.dosage;
        document.getElementById('medication-interval').value = med.interval;
        document.getElementById('medication-price').value = med.price;
        document.getElementById('medication-pharmacy').value = med.pharmacy;
        document.getElementById('medication-observations').value = med.observations;
        document.getElementById('medication-form-title').textContent = 'Edit medication';
        document.getElementById('medication-submit').textContent = 'Save';
        document.getElementById('medication-cancel').classList.remove('hidden');
      }
      if (deleteId) {
        api(`/api/medications/${deleteId}`, { method: 'DELETE' })
          .then(() => {
            setStatus('Medication removed', 'ok');
            return Promise.all([loadMedications(), loadSchedules()]);
          })
          .catch((err) => setStatus(err.message, 'error'));
      }
    });

    document.getElementById('medication-cancel').addEventListener('click', resetMedicationForm);

    document.getElementById('medication-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const id = document.getElementById('medication-id').value;
      const payload = {
        name: document.getElementById('medication-name').value,
        dosage: document.getElementById('medication-dosage').value,
        interval: document.getElementById('medication-interval').value,
        observations: document.getElementById('medication-observations').value,
        price: document.getElementById('medication-price').value,
        pharmacy: document.getElementById('medication-pharmacy').value
      };
      const request = id
        ? api(`/api/medications/${id}`, { method: 'PUT', body: JSON.stringify(payload) })
        : api('/api/medications', { method: 'POST', body: JSON.stringify(payload) });
      request
        .then((med) => {
          setStatus(`${med.name} ${id ? 'updated' : 'added'}`, 'ok');
          resetMedicationForm();
          return loadMedications();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    // ---- schedules ----

    const renderAlertBanner = (alerts) => {
      const banner = document.getElementById('alert-banner');
      if (!alerts.length) {
        banner.classList.remove('visible');
        banner.textContent = '';
        return;
      }
      banner.classList.add('visible');
      banner.textContent = `You have ${alerts.length} medication${alerts.length > 1 ? 's' : ''} waiting for confirmation!`;
    };

    const loadAlerts = () =>
      api('/api/schedules/alerts').then(renderAlertBanner);

    const renderSchedules = (entries) => {
      const target = document.getElementById('schedules-table');
      if (!entries.length) {
        target.innerHTML = '<p class="muted">No schedules for this date.</p>';
        return;
      }
      target.innerHTML = `
        <table>
          <thead><tr><th>Medication</th><th>Time</th><th>Status</th><th>Actions</th></tr></thead>
          <tbody>
            ${entries.map((entry) => `
              <tr${entry.alert_active ? ' style="background: rgba(198, 59, 43, 0.06);"' : ''}>
                <td><strong>${escapeHtml(entry.medication_name)}</strong></td>
                <td><span class="pill ${entry.period}">${escapeHtml(entry.time)}</span></td>
                <td><span class="pill ${entry.status}">${entry.status}</span></td>
                <td>
                  ${entry.status === 'pending' ? `
                    <button class="btn-ok" data-take="${entry.id}" type="button">Taken</button>
                    <button class="btn-danger" data-miss="${entry.id}" type="button">Not taken</button>` : ''}
                  <button class="btn-quiet" data-remind="${entry.id}" type="button">Reminder</button>
                  <button class="btn-danger" data-delete-schedule="${entry.id}" type="button">Remove</button>
                </td>
              </tr>`).join('')}
          </tbody>
        </table>`;
    };

    const loadSchedules = async () => {
      const date = document.getElementById('schedule-date').value;
      const entries = await api(`/api/schedules?date=${date}`);
      renderSchedules(entries);
      await loadAlerts();
    };

    document.getElementById('schedule-date').addEventListener('change', () => {
      loadSchedules().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('schedules-table').addEventListener('click', (event) => {
      const data = event.target.dataset;
      const setScheduleStatus = (id, status, message) =>
        api(`/api/schedules/${id}/status`, {
          method: 'POST',
          body: JSON.stringify({ status })
        })
          .then(() => {
            setStatus(message, 'ok');
            return loadSchedules();
          })
          .catch((err) => setStatus(err.message, 'error'));

      if (data.take) {
        setScheduleStatus(data.take, 'completed', 'Medication taken, record updated');
      } else if (data.miss) {
        setScheduleStatus(data.miss, 'missed', 'We recorded that the medication was not taken');
      } else if (data.remind) {
        api(`/api/schedules/${data.remind}/whatsapp-link`)
          .then((link) => window.open(link.url, '_blank'))
          .catch((err) => setStatus(err.message, 'error'));
      } else if (data.deleteSchedule) {
        api(`/api/schedules/${data.deleteSchedule}`, { method: 'DELETE' })
          .then(() => {
            setStatus('Schedule removed', 'ok');
            return loadSchedules();
          })
          .catch((err) => setStatus(err.message, 'error'));
      }
    });

    document.getElementById('simulate-alert').addEventListener('click', () => {
      api('/api/schedules/alerts/simulate', { method: 'POST' })
        .then((entry) => {
          if (entry) {
            setStatus(`Time to take ${entry.medication_name} (${entry.time})`, 'error');
          } else {
            setStatus('No pending schedule left to alert', 'ok');
          }
          return loadSchedules();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('schedule-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const medicationId = Number(document.getElementById('schedule-medication').value);
      if (!medicationId) {
        setStatus('Register a medication first', 'error');
        return;
      }
      api('/api/schedules', {
        method: 'POST',
        body: JSON.stringify({
          medication_id: medicationId,
          date: document.getElementById('schedule-new-date').value,
          time: document.getElementById('schedule-time').value
        })
      })
        .then((entry) => {
          setStatus(`${entry.medication_name} scheduled for ${entry.date} at ${entry.time}`, 'ok');
          return loadSchedules();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    // ---- caregivers ----

    let caregivers = [];

    const renderCaregivers = () => {
      const target = document.getElementById('caregivers-table');
      if (!caregivers.length) {
        target.innerHTML = '<p class="muted">No caregivers registered yet.</p>';
        return;
      }
      target.innerHTML = `
        <table>
          <thead><tr><th>Name</th><th>Phone</th><th>Email</th><th>Shift</th><th>Notes</th><th>Actions</th></tr></thead>
          <tbody>
            ${caregivers.map((cg) => `
              <tr>
                <td><strong>${escapeHtml(cg.name)}</strong></td>
                <td>${escapeHtml(cg.phone)}</td>
                <td>${escapeHtml(cg.email)}</td>
                <td>${escapeHtml(cg.shift)}</td>
                <td>${escapeHtml(cg.notes)}</td>
                <td>
                  <button class="btn-quiet" data-edit-cg="${cg.id}" type="button">Edit</button>
                  <button class="btn-danger" data-delete-cg="${cg.id}" type="button">Remove</button>
                </td>
              </tr>`).join('')}
          </tbody>
        </table>`;
    };

    const loadCaregivers = async () => {
      caregivers = await api('/api/caregivers');
      renderCaregivers();
    };

    const resetCaregiverForm = () => {
      document.getElementById('caregiver-id').value = '';
      document.getElementById('caregiver-form').reset();
      document.getElementById('caregiver-form-title').textContent = 'Add caregiver';
      document.getElementById('caregiver-submit').textContent = 'Add';
      document.getElementById('caregiver-cancel').classList.add('hidden');
    };

    document.getElementById('caregivers-table').addEventListener('click', (event) => {
      const editId = event.target.dataset.editCg;
      const deleteId = event.target.dataset.deleteCg;
      if (editId) {
        const cg = caregivers.find((c) => c.id === Number(editId));
        if (!cg) return;
        document.getElementById('caregiver-id').value = cg.id;
        document.getElementById('caregiver-name').value = cg.name;
        document.getElementById('caregiver-phone').value = cg.phone;
        document.getElementById('caregiver-email').value = cg.email;
        document.getElementById('caregiver-shift').value = cg.shift;
        document.getElementById('caregiver-notes').value = cg.notes;
        document.getElementById('caregiver-form-title').textContent = 'Edit caregiver';
        document.getElementById('caregiver-submit').textContent = 'Save';
        document.getElementById('caregiver-cancel').classList.remove('hidden');
      }
      if (deleteId) {
        api(`/api/caregivers/${deleteId}`, { method: 'DELETE' })
          .then(() => {
            setStatus('Caregiver removed', 'ok');
            return loadCaregivers();
          })
          .catch((err) => setStatus(err.message, 'error'));
      }
    });

    document.getElementById('caregiver-cancel').addEventListener('click', resetCaregiverForm);

    document.getElementById('caregiver-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const id = document.getElementById('caregiver-id').value;
      const payload = {
        name: document.getElementById('caregiver-name').value,
        phone: document.getElementById('caregiver-phone').value,
        email: document.getElementById('caregiver-email').value,
        shift: document.getElementById('caregiver-shift').value,
        notes: document.getElementById('caregiver-notes').value
      };
      const request = id
        ? api(`/api/caregivers/${id}`, { method: 'PUT', body: JSON.stringify(payload) })
        : api('/api/caregivers', { method: 'POST', body: JSON.stringify(payload) });
      request
        .then((cg) => {
          setStatus(`${cg.name} ${id ? 'updated' : 'added'}`, 'ok');
          resetCaregiverForm();
          return loadCaregivers();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    // ---- reports ----

    const reportQuery = () => {
      const start = document.getElementById('report-start').value;
      const end = document.getElementById('report-end').value;
      const params = new URLSearchParams();
      if (start) params.set('start', start);
      if (end) params.set('end', end);
      const qs = params.toString();
      return qs ? `?${qs}` : '';
    };

    const renderMedicationReport = (rows) => `
      <table>
        <thead><tr><th>Medication</th><th>Dosage</th><th>Date</th><th>Time</th><th>Status</th><th>Reason</th></tr></thead>
        <tbody>
          ${rows.map((row) => `
            <tr>
              <td>${escapeHtml(row.name)}</td>
              <td>${escapeHtml(row.dosage)}</td>
              <td>${row.date}</td>
              <td>${escapeHtml(row.time)}</td>
              <td><span class="pill ${row.status === 'taken' ? 'completed' : 'missed'}">${row.status}</span></td>
              <td>${escapeHtml(row.reason || 'not informed')}</td>
            </tr>`).join('')}
        </tbody>
      </table>
      ${rows.length ? '' : '<p class="muted">No resolved doses in this period.</p>'}`;

    const renderFinancialReport = (report) => `
      <table>
        <thead><tr><th>Medication</th><th>Unit price</th><th>Pharmacy</th><th>Date</th><th>Qty</th><th>Total</th></tr></thead>
        <tbody>
          ${report.rows.map((row) => `
            <tr>
              <td>${escapeHtml(row.medication_name)}</td>
              <td>${escapeHtml(row.unit_price)}</td>
              <td>${escapeHtml(row.pharmacy)}</td>
              <td>${row.date}</td>
              <td>${row.quantity}</td>
              <td>${escapeHtml(row.total)}</td>
            </tr>`).join('')}
        </tbody>
      </table>
      <div class="stats-row" style="margin-top: 12px;">
        <div class="stat"><span class="label">Total spent</span><span class="value">${escapeHtml(report.grand_total)}</span></div>
      </div>`;

    const renderQualityReport = (report) => `
      <table>
        <thead><tr><th>Medication</th><th>Total doses</th><th>Taken</th><th>Missed</th><th>Adherence</th></tr></thead>
        <tbody>
          ${report.rows.map((row) => `
            <tr>
              <td>${escapeHtml(row.medication_name)}</td>
              <td>${row.total_doses}</td>
              <td>${row.taken_doses}</td>
              <td>${row.missed_doses}</td>
              <td><span class="pill ${row.adherence_rate >= 80 ? 'completed' : row.adherence_rate >= 50 ? 'pending' : 'missed'}">${row.adherence_rate.toFixed(0)}%</span></td>
            </tr>`).join('')}
        </tbody>
      </table>
      <div class="stats-row" style="margin-top: 12px;">
        <div class="stat"><span class="label">Average adherence</span><span class="value">${report.average_adherence.toFixed(0)}%</span></div>
        <div class="stat"><span class="label">Doses taken</span><span class="value">${report.total_taken}</span></div>
        <div class="stat"><span class="label">Doses missed</span><span class="value">${report.total_missed}</span></div>
      </div>`;

    const loadReport = async () => {
      const type = document.getElementById('report-type').value;
      const target = document.getElementById('report-content');
      const data = await api(`/api/reports/${type}${reportQuery()}`);
      if (type === 'medication') {
        target.innerHTML = renderMedicationReport(data);
      } else if (type === 'financial') {
        target.innerHTML = renderFinancialReport(data);
      } else {
        target.innerHTML = renderQualityReport(data);
      }
    };

    document.getElementById('report-refresh').addEventListener('click', () => {
      loadReport().catch((err) => setStatus(err.message, 'error'));
    });
    document.getElementById('report-type').addEventListener('change', () => {
      loadReport().catch((err) => setStatus(err.message, 'error'));
    });
    document.getElementById('report-pdf').addEventListener('click', () => {
      const type = document.getElementById('report-type').value;
      window.open(`/api/reports/${type}/pdf${reportQuery()}`, '_blank');
      setStatus('Report generated', 'ok');
    });

    // ---- reminders ----

    const loadReminders = async () => {
      const settings = await api('/api/reminders');
      document.getElementById('reminder-enabled').checked = settings.enable_whatsapp;
      document.getElementById('reminder-phone').value = settings.phone_number;
      document.getElementById('reminder-lead').value = settings.lead_minutes;
      document.getElementById('reminder-message').value = settings.custom_message;
    };

    document.getElementById('reminder-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/reminders', {
        method: 'PUT',
        body: JSON.stringify({
          enable_whatsapp: document.getElementById('reminder-enabled').checked,
          phone_number: document.getElementById('reminder-phone').value,
          lead_minutes: Number(document.getElementById('reminder-lead').value) || 0,
          custom_message: document.getElementById('reminder-message').value
        })
      })
        .then(() => setStatus('Reminder preferences saved', 'ok'))
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('reminder-test').addEventListener('click', () => {
      api('/api/reminders/test-link')
        .then((links) => window.open(links.phone_url, '_blank'))
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('reminder-test-direct').addEventListener('click', () => {
      api('/api/reminders/test-link')
        .then((links) => window.open(links.direct_url, '_blank'))
        .catch((err) => setStatus(err.message, 'error'));
    });

    // ---- community ----

    const loadCommunity = async () => {
      const [posts, groups] = await Promise.all([
        api('/api/community/posts'),
        api('/api/community/groups')
      ]);

      document.getElementById('posts-list').innerHTML = posts.map((post) => `
        <div class="post">
          <div class="meta">
            <span class="avatar">${escapeHtml(post.avatar)}</span>
            <strong>${escapeHtml(post.author)}</strong>
            <span>${post.date}</span>
            <span class="pill pending">${post.category}</span>
          </div>
          <div>${escapeHtml(post.content)}</div>
          <div class="meta">
            <button class="btn-quiet" data-like="${post.id}" type="button">Like (${post.likes})</button>
            <span>${post.comments} comments</span>
          </div>
        </div>`).join('') || '<p class="muted">No posts yet.</p>';

      document.getElementById('groups-list').innerHTML = groups.map((group) => `
        <div class="post">
          <strong>${escapeHtml(group.name)}</strong>
          <span class="muted">${group.members} members · ${escapeHtml(group.category)}</span>
          <div>${escapeHtml(group.description)}</div>
          <div><button class="btn-quiet" data-join="${group.id}" type="button">Join group</button></div>
        </div>`).join('');
    };

    document.getElementById('posts-list').addEventListener('click', (event) => {
      const id = event.target.dataset.like;
      if (!id) return;
      api(`/api/community/posts/${id}/like`, { method: 'POST' })
        .then(() => loadCommunity())
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('groups-list').addEventListener('click', (event) => {
      const id = event.target.dataset.join;
      if (!id) return;
      api(`/api/community/groups/${id}/join`, { method: 'POST' })
        .then((group) => {
          setStatus(`Joined ${group.name}`, 'ok');
          return loadCommunity();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('post-form').addEventListener('submit', (event) => {
      event.preventDefault();
      if (!currentUser) return;
      api('/api/community/posts', {
        method: 'POST',
        body: JSON.stringify({
          author: currentUser.name,
          content: document.getElementById('post-content').value,
          category: document.getElementById('post-category').value
        })
      })
        .then(() => {
          document.getElementById('post-content').value = '';
          setStatus('Posted to the forum', 'ok');
          return loadCommunity();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    // ---- medication database ----

    const loadReference = async () => {
      const search = encodeURIComponent(document.getElementById('reference-search').value);
      const favorites = document.getElementById('reference-favorites').checked;
      const entries = await api(`/api/reference?search=${search}&favorites=${favorites}`);
      const target = document.getElementById('reference-table');
      if (!entries.length) {
        target.innerHTML = '<p class="muted">No entries match your search.</p>';
        return;
      }
      target.innerHTML = `
        <table>
          <thead><tr><th></th><th>Name</th><th>Generic</th><th>Class</th><th>Usage</th><th>Dosage</th><th>Side effects</th><th>Interactions</th></tr></thead>
          <tbody>
            ${entries.map((entry) => `
              <tr>
                <td><button class="btn-quiet" data-favorite="${entry.id}" type="button">${entry.favorite ? '★' : '☆'}</button></td>
                <td><strong>${escapeHtml(entry.name)}</strong></td>
                <td>${escapeHtml(entry.generic)}</td>
                <td>${escapeHtml(entry.classification)}</td>
                <td>${escapeHtml(entry.usage)}</td>
                <td>${escapeHtml(entry.dosage)}</td>
                <td class="muted">${entry.side_effects.map(escapeHtml).join(', ')}</td>
                <td class="muted">${entry.interactions.map(escapeHtml).join(', ')}</td>
              </tr>`).join('')}
          </tbody>
        </table>`;
    };

    document.getElementById('reference-search').addEventListener('input', () => {
      loadReference().catch((err) => setStatus(err.message, 'error'));
    });
    document.getElementById('reference-favorites').addEventListener('change', () => {
      loadReference().catch((err) => setStatus(err.message, 'error'));
    });
    document.getElementById('reference-table').addEventListener('click', (event) => {
      const id = event.target.dataset.favorite;
      if (!id) return;
      api(`/api/reference/${id}/favorite`, { method: 'POST' })
        .then(() => loadReference())
        .catch((err) => setStatus(err.message, 'error'));
    });

    // ---- boot ----

    const refreshAll = () =>
      Promise.all([
        loadMedications().then(loadSchedules),
        loadCaregivers(),
        loadReport(),
        loadReminders(),
        loadCommunity(),
        loadReference()
      ]);

    if (localStorage.getItem(TOKEN_KEY)) {
      api('/api/auth/session')
        .then(showApp)
        .catch(() => showAuth());
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::render_index;

    #[test]
    fn index_injects_the_date_placeholder() {
        let html = render_index("2026-03-10");
        assert!(html.contains("value=\"2026-03-10\""));
        assert!(!html.contains("{{TODAY}}"));
    }
}
